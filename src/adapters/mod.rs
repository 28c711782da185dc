//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the cycle store to external systems:
//! - `http` - REST client for the cycle API
//! - `memory` - In-memory backend and static context ports
//! - `clock` - System and fixed clocks

pub mod clock;
pub mod http;
pub mod memory;

pub use clock::{FixedClock, SystemClock};
pub use http::{HttpCycleService, HttpCycleServiceConfig};
pub use memory::{
    InMemoryCycleService, StaticEstimateFlags, StaticFilterSource, StaticRouterContext,
};
