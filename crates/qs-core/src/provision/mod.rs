//! Base and provisionable labels of a notified task.
//!
//! A task carries one or two slices. With two slices the first one is tried first and the
//! second is the fallback; the fallback may only drop dimensions, never add them.
//! Dimensions the first slice adds on top of the fallback are *provisionable*.

use std::collections::BTreeSet;

use qs_model::{Label, TaskLabels, TaskSlice};
use tracing::debug;

use crate::error::CoreError;

/// Labels present in the first slice but absent from the fallback slice, sorted.
///
/// Fails with [`CoreError::InvalidSliceCount`] for zero or more than two slices, and with
/// [`CoreError::InconsistentSliceDimensions`] if the fallback slice adds dimensions.
pub fn provisionable_labels(slices: &[TaskSlice]) -> Result<Vec<Label>, CoreError> {
    match slices {
        [] => Err(CoreError::InvalidSliceCount(0)),
        [_] => Ok(Vec::new()),
        [first, fallback] => {
            let first = dimension_set(first);
            let fallback = dimension_set(fallback);

            let extra: Vec<Label> = fallback.difference(&first).map(|s| s.to_string()).collect();
            if !extra.is_empty() {
                debug!(?extra, "fallback slice adds dimensions");
                return Err(CoreError::InconsistentSliceDimensions { extra });
            }
            Ok(first.difference(&fallback).map(|s| s.to_string()).collect())
        }
        _ => Err(CoreError::InvalidSliceCount(slices.len())),
    }
}

/// Dimensions of the last slice, sorted and deduplicated.
///
/// The last slice is the most relaxed one, so its dimensions hold in every slice.
pub fn base_labels(slices: &[TaskSlice]) -> Result<Vec<Label>, CoreError> {
    match slices {
        [] => Err(CoreError::InvalidSliceCount(0)),
        [only] => Ok(dimension_set(only).into_iter().map(str::to_string).collect()),
        [_, fallback] => Ok(dimension_set(fallback)
            .into_iter()
            .map(str::to_string)
            .collect()),
        _ => Err(CoreError::InvalidSliceCount(slices.len())),
    }
}

/// Base and provisionable labels of a task, validated together.
pub fn task_labels(slices: &[TaskSlice]) -> Result<TaskLabels, CoreError> {
    let provisionable = provisionable_labels(slices)?;
    let base = base_labels(slices)?;
    Ok(TaskLabels {
        base,
        provisionable,
    })
}

fn dimension_set(slice: &TaskSlice) -> BTreeSet<&str> {
    slice.dimensions.iter().map(String::as_str).collect()
}
