//! Value types shared by the label accounting crates.
//!
//! Nothing here depends on a live scheduler: digests, utilization records and
//! task slices are plain data that can be built in tests or loaded from JSON.

mod domain;
pub use domain::*;
