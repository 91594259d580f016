use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use qs_model::{LabelDigest, LabelSet, LabelUtilization, SchedulerId, UtilizationMap};
use tracing::{debug, instrument};

/// Per-scheduler label utilization accumulator.
///
/// Remembers every label ever seen as a task base label for each scheduler ID,
/// so a label that stops being requested is reported as zero instead of vanishing.
/// The known-label sets only grow for the lifetime of the counter.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct LabelUtilizationCounter {
    inner: Arc<Mutex<CounterInner>>,
}

struct CounterInner {
    /// Labels ever observed as a task base label, by scheduler ID.
    known: HashMap<SchedulerId, LabelSet>,
}

impl LabelUtilizationCounter {
    /// Create a counter with no known labels.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CounterInner {
                known: HashMap::new(),
            })),
        }
    }

    /// Compute the utilization of every known label of `scheduler_id`.
    ///
    /// Task base labels in `digest` join the known set first. Every known label gets
    /// an entry with all four counters, and worker labels outside the known set are ignored.
    #[instrument(level = "trace", skip(self, digest), fields(scheduler_id = %scheduler_id))]
    pub fn compute(&self, scheduler_id: &str, digest: &LabelDigest) -> UtilizationMap {
        let mut inner = self.lock();

        let known = inner.known.entry(scheduler_id.to_string()).or_default();
        let before = known.len();
        for labels in digest.task_base_labels() {
            known.extend(labels.iter().cloned());
        }
        if known.len() > before {
            debug!(
                added = known.len() - before,
                total = known.len(),
                "new task labels observed"
            );
        }

        let mut out: UtilizationMap = known
            .iter()
            .map(|label| (label.clone(), LabelUtilization::default()))
            .collect();

        for labels in digest.running_task_base_labels() {
            for label in labels {
                if let Some(u) = out.get_mut(label) {
                    u.running_requests += 1;
                }
            }
        }
        for labels in digest.waiting_task_base_labels() {
            for label in labels {
                if let Some(u) = out.get_mut(label) {
                    u.waiting_requests += 1;
                }
            }
        }
        for labels in digest.idle_worker_labels() {
            for label in labels {
                if let Some(u) = out.get_mut(label) {
                    u.idle_bots += 1;
                }
            }
        }
        for labels in digest.running_worker_labels() {
            for label in labels {
                if let Some(u) = out.get_mut(label) {
                    u.running_bots += 1;
                }
            }
        }

        out
    }

    /// Labels known for `scheduler_id`; empty if the scheduler was never computed.
    pub fn known_labels(&self, scheduler_id: &str) -> LabelSet {
        self.lock()
            .known
            .get(scheduler_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Scheduler IDs the counter holds state for.
    pub fn scheduler_ids(&self) -> Vec<SchedulerId> {
        let mut ids: Vec<_> = self.lock().known.keys().cloned().collect();
        ids.sort();
        ids
    }

    // Known sets only grow, so a poisoned lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, CounterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LabelUtilizationCounter {
    fn default() -> Self {
        Self::new()
    }
}
