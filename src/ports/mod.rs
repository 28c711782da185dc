//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the cycle cache and the outside world. Adapters implement these ports.
//!
//! ## Remote Ports
//!
//! - `CycleService` - Standard cycle CRUD, favorites and date checks
//! - `CycleArchiveService` - Archive, restore and archived listings
//!
//! ## Context Ports
//!
//! - `RouterContext` - Workspace and project currently open
//! - `CycleFilterSource` - Search text, filter predicates and ordering
//! - `EstimateFlags` - Per-project estimation feature flag
//! - `Clock` - Calendar date for classification

mod clock;
mod cycle_archive_service;
mod cycle_filter_source;
mod cycle_service;
mod estimate_flags;
mod router_context;
mod service_error;

pub use clock::Clock;
pub use cycle_archive_service::{ArchiveReceipt, CycleArchiveService};
pub use cycle_filter_source::CycleFilterSource;
pub use cycle_service::{CycleListFilter, CycleService};
pub use estimate_flags::EstimateFlags;
pub use router_context::RouterContext;
pub use service_error::ServiceError;
