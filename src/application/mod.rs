//! Application layer - the cycle store.
//!
//! The store orchestrates the remote cycle ports and the context ports and
//! owns the only mutable copy of cycle state.

pub mod cycle_store;

pub use cycle_store::{CycleState, CycleStore, CycleStoreDeps, StoreChange};
