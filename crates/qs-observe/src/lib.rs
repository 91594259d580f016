//! Logging setup shared by the qsched binaries.

mod logger;
pub use logger::*;
