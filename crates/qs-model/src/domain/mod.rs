mod label;
pub use label::{Label, LabelSet};

mod label_digest;
pub use label_digest::LabelDigest;

mod label_utilization;
pub use label_utilization::{LabelUtilization, UtilizationMap};

mod task_slice;
pub use task_slice::{TaskLabels, TaskSlice};

/// Identifier of an independent scheduler instance.
///
/// Label accounting never mixes state between two scheduler IDs.
pub type SchedulerId = String;
