//! Cycle Store - observable client-side cache for project cycles
//!
//! This crate holds an in-memory copy of a project's cycles, derives the
//! sorted and filtered views a UI renders, and mediates create, update,
//! delete, archive and favorite calls against the remote cycle API while
//! keeping the cache consistent.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
