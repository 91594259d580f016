//! Prometheus gauges for scheduler label utilization.
//!
//! This crate provides [`LabelMetrics`], which publishes the output of
//! [`qs_core::LabelUtilizationCounter::compute`] as gauges keyed by scheduler and label.
//!
//! ## Example
//! ```rust
//! use qs_core::{LabelUtilizationCounter, RequestSnapshot, SchedulerSnapshot, build_digest};
//! use qs_prometheus::LabelMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = LabelMetrics::new()?;
//! let counter = LabelUtilizationCounter::new();
//!
//! let mut snapshot = SchedulerSnapshot::new();
//! snapshot.add_request(RequestSnapshot::new("r1", ["pool:A"]));
//!
//! let utilization = counter.compute("sched-1", &build_digest(&snapshot));
//! metrics.observe("sched-1", &utilization);
//! metrics.observe_counts("sched-1", snapshot.counts());
//!
//! let text = metrics.encode_text()?;
//! assert!(text.contains("qscheduler_label_waiting_requests"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `qscheduler_label_running_bots{scheduler_id, label}` - Gauge
//! - `qscheduler_label_idle_bots{scheduler_id, label}` - Gauge
//! - `qscheduler_label_running_requests{scheduler_id, label}` - Gauge
//! - `qscheduler_label_waiting_requests{scheduler_id, label}` - Gauge
//! - `qscheduler_state_entities{scheduler_id, state}` - Gauge
//!
//! ## HTTP Server
//! This crate does NOT provide an HTTP server for the `/metrics` endpoint;
//! see `qs-reportd` for one built on axum.

mod backend;
pub use backend::LabelMetrics;

mod error;
pub use error::MetricsError;

pub use prometheus::{Encoder, Registry, TextEncoder};
