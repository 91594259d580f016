use serde::{Deserialize, Serialize};

use crate::Label;

/// One candidate dimension set of a task.
///
/// Slices are tried in order; later slices relax the constraints of earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSlice {
    /// Raw `key:value` dimension strings.
    #[serde(default)]
    pub dimensions: Vec<String>,
}

impl TaskSlice {
    pub fn new<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimensions: dimensions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Labels derived from the slices of a notified task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLabels {
    /// Dimensions fixed across every slice.
    pub base: Vec<Label>,
    /// Dimensions the first slice adds on top of the fallback slice.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provisionable: Vec<Label>,
}
