//! In-memory adapters.
//!
//! A fake cycle backend plus static context ports, for tests and for hosts
//! that have no router or filter store of their own.

mod context;
mod cycle_backend;

pub use context::{StaticEstimateFlags, StaticFilterSource, StaticRouterContext};
pub use cycle_backend::InMemoryCycleService;
