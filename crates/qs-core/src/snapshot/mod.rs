use qs_model::TaskSlice;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::CoreError,
    provision::task_labels,
    view::{RequestView, SchedulerView, WorkerView},
};

/// A request as held by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSnapshot {
    pub id: String,
    #[serde(default)]
    pub base_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provisionable_labels: Vec<String>,
    /// Slices of the notified task; when present they define both label lists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<TaskSlice>,
}

impl RequestSnapshot {
    pub fn new<I, S>(id: impl Into<String>, base_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            base_labels: base_labels.into_iter().map(Into::into).collect(),
            provisionable_labels: Vec::new(),
            slices: Vec::new(),
        }
    }

    /// Build a request from the slices of a task notification.
    pub fn from_slices(id: impl Into<String>, slices: Vec<TaskSlice>) -> Result<Self, CoreError> {
        let labels = task_labels(&slices)?;
        Ok(Self {
            id: id.into(),
            base_labels: labels.base,
            provisionable_labels: labels.provisionable,
            slices,
        })
    }

    /// Recompute base and provisionable labels from `slices`, if any.
    pub fn resolve_slices(&mut self) -> Result<(), CoreError> {
        if self.slices.is_empty() {
            return Ok(());
        }
        let labels = task_labels(&self.slices)?;
        self.base_labels = labels.base;
        self.provisionable_labels = labels.provisionable;
        Ok(())
    }
}

/// A bot as held by the scheduler; `running` is `None` while idle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSnapshot {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<RequestSnapshot>,
}

/// Number of entities per scheduling state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub waiting: usize,
    pub running: usize,
    pub idle: usize,
}

/// Point-in-time copy of a scheduler's requests and workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSnapshot {
    #[serde(default)]
    pub waiting: Vec<RequestSnapshot>,
    #[serde(default)]
    pub workers: Vec<WorkerSnapshot>,
}

impl SchedulerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a waiting request.
    pub fn add_request(&mut self, request: RequestSnapshot) -> &mut Self {
        self.waiting.push(request);
        self
    }

    pub fn add_idle_worker<I, S>(&mut self, id: impl Into<String>, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.workers.push(WorkerSnapshot {
            id: id.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            running: None,
        });
        self
    }

    pub fn add_running_worker<I, S>(
        &mut self,
        id: impl Into<String>,
        labels: I,
        request: RequestSnapshot,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.workers.push(WorkerSnapshot {
            id: id.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            running: Some(request),
        });
        self
    }

    /// Derive request labels from slices.
    ///
    /// Waiting requests with malformed slices are rejected and removed. A running request
    /// has already been admitted, so it keeps its stored labels. Returns the rejected IDs.
    pub fn resolve_slices(&mut self) -> Vec<(String, CoreError)> {
        let mut rejected = Vec::new();
        self.waiting.retain_mut(|request| match request.resolve_slices() {
            Ok(()) => true,
            Err(e) => {
                rejected.push((request.id.clone(), e));
                false
            }
        });
        for worker in &mut self.workers {
            if let Some(request) = worker.running.as_mut()
                && let Err(e) = request.resolve_slices()
            {
                warn!(worker = %worker.id, request = %request.id, error = %e, "running request has malformed slices");
            }
        }
        rejected
    }

    pub fn counts(&self) -> StateCounts {
        let running = self.workers.iter().filter(|w| w.running.is_some()).count();
        StateCounts {
            waiting: self.waiting.len(),
            running,
            idle: self.workers.len() - running,
        }
    }
}

impl RequestView for RequestSnapshot {
    fn base_labels(&self) -> &[String] {
        &self.base_labels
    }
}

impl WorkerView for WorkerSnapshot {
    type Request = RequestSnapshot;

    fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn running_request(&self) -> Option<&RequestSnapshot> {
        self.running.as_ref()
    }
}

impl SchedulerView for SchedulerSnapshot {
    type Request = RequestSnapshot;
    type Worker = WorkerSnapshot;

    fn waiting_requests(&self) -> impl Iterator<Item = &RequestSnapshot> {
        self.waiting.iter()
    }

    fn workers(&self) -> impl Iterator<Item = &WorkerSnapshot> {
        self.workers.iter()
    }
}
