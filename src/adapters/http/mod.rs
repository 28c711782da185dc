//! HTTP adapters - clients for the remote cycle API.

mod cycle_client;

pub use cycle_client::{HttpCycleService, HttpCycleServiceConfig};
