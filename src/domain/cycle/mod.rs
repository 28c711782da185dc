//! Cycle module - the cached cycle record and the pure rules over it.
//!
//! A cycle is a time-boxed project iteration. This module owns the record
//! shape, merge rules, date classification, filters and list orderings;
//! nothing here touches the network or the store.

mod classification;
mod filters;
mod ordering;
mod plot_type;
mod record;
mod wire;

pub use filters::{matches_search, CycleFilters, DateBound, DateFilter};
pub use ordering::{
    by_sort_order, sort_by_sort_order, sort_dated_first, OrderingPolicy, StatusOrderingPolicy,
};
pub use plot_type::CyclePlotType;
pub use record::{
    CyclePatch, CycleProgress, CycleRecord, DateCheckRequest, DateCheckResult, DEFAULT_SORT_ORDER,
};
