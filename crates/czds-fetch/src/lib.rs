//! Concurrent zone fetching with staleness checks and atomic placement.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Options, work items and outcomes
//! - [`plan`] - Pure decisions (paths, staleness, length checks)
//! - [`effects`] - Worker pools, probe and transfer stages, the pipeline
//!
//! # Flow
//!
//! Zone URLs enter the probe pool, which looks up remote details and the local
//! file and either settles the item as skipped or hands a [`WorkItem`] to the
//! transfer pool. The transfer pool streams into `<destination>.tmp`, checks
//! the byte count and renames onto the destination. Every submitted URL
//! settles exactly one [`Outcome`]; [`Pipeline::run`] returns once all of
//! them have.

pub mod data;
mod effects;
mod error;
pub mod plan;

pub use data::{
    FetchOptions, LengthCheck, LocalFileState, Outcome, Report, RunSummary, Stage, WorkItem,
};
pub use effects::{Pipeline, Ticket, WorkerPool, transfer};
pub use error::{FetchError, Result};
