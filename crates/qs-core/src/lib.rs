//! Label accounting for a quota scheduler.
//!
//! The pipeline runs leaves first:
//! 1. [`build_digest`] condenses a [`SchedulerView`] into a [`qs_model::LabelDigest`].
//! 2. [`LabelUtilizationCounter::compute`] turns digests into per-label utilization.
//! 3. Exporters (see `qs-prometheus`) publish the result as gauges.
//!
//! [`provisionable_labels`] runs independently when a task is notified.

pub mod error;
pub use error::CoreError;

pub mod view;
pub use view::{RequestView, SchedulerView, WorkerView};

pub mod digest;
pub use digest::build_digest;

pub mod state;
pub use state::LabelUtilizationCounter;

pub mod provision;
pub use provision::{base_labels, provisionable_labels, task_labels};

pub mod snapshot;
pub use snapshot::{RequestSnapshot, SchedulerSnapshot, StateCounts, WorkerSnapshot};
