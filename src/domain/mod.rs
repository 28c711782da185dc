//! Domain layer containing the cycle model and the rules applied to it.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, status, errors)
//! - `cycle` - Cycle record, merge rules, classification, filters and orderings

pub mod cycle;
pub mod foundation;
