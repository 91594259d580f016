use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Label;

/// Utilization of one label within one scheduler, for a single accounting cycle.
///
/// All four counters are always present; a label with no activity reports zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelUtilization {
    /// Bots carrying the label that are executing a request.
    pub running_bots: u64,
    /// Bots carrying the label with no running request.
    pub idle_bots: u64,
    /// Running requests with the label among their base labels.
    pub running_requests: u64,
    /// Waiting requests with the label among their base labels.
    pub waiting_requests: u64,
}

impl LabelUtilization {
    /// Returns `true` if every counter is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-label utilization of one scheduler, ordered by label.
pub type UtilizationMap = BTreeMap<Label, LabelUtilization>;
