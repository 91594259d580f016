use serde::Serialize;

use crate::LabelSet;

/// Snapshot of the labels a scheduler currently sees, rebuilt on every accounting cycle.
///
/// Running tasks and running workers are stored pairwise: the task at position `i`
/// of [`LabelDigest::running_task_base_labels`] is executed by the worker at
/// position `i` of [`LabelDigest::running_worker_labels`].
/// Both halves are only ever appended together through [`LabelDigest::push_running`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDigest {
    waiting_task_base_labels: Vec<LabelSet>,
    running_task_base_labels: Vec<LabelSet>,
    idle_worker_labels: Vec<LabelSet>,
    running_worker_labels: Vec<LabelSet>,
}

impl LabelDigest {
    /// Create an empty digest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the base labels of one waiting task.
    pub fn push_waiting<I, S>(&mut self, base_labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.waiting_task_base_labels
            .push(base_labels.into_iter().map(Into::into).collect());
    }

    /// Record the labels of one idle worker.
    pub fn push_idle<I, S>(&mut self, worker_labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.idle_worker_labels
            .push(worker_labels.into_iter().map(Into::into).collect());
    }

    /// Record a running worker together with the base labels of the task it executes.
    pub fn push_running<T, W, S1, S2>(&mut self, task_base_labels: T, worker_labels: W)
    where
        T: IntoIterator<Item = S1>,
        W: IntoIterator<Item = S2>,
        S1: Into<String>,
        S2: Into<String>,
    {
        self.running_task_base_labels
            .push(task_base_labels.into_iter().map(Into::into).collect());
        self.running_worker_labels
            .push(worker_labels.into_iter().map(Into::into).collect());
    }

    /// Base labels of each waiting task, in view order.
    pub fn waiting_task_base_labels(&self) -> &[LabelSet] {
        &self.waiting_task_base_labels
    }

    /// Base labels of each running task, aligned with [`Self::running_worker_labels`].
    pub fn running_task_base_labels(&self) -> &[LabelSet] {
        &self.running_task_base_labels
    }

    /// Labels of each idle worker.
    pub fn idle_worker_labels(&self) -> &[LabelSet] {
        &self.idle_worker_labels
    }

    /// Labels of each busy worker, aligned with [`Self::running_task_base_labels`].
    pub fn running_worker_labels(&self) -> &[LabelSet] {
        &self.running_worker_labels
    }

    /// Iterate `(task base labels, worker labels)` for every running worker.
    pub fn running_pairs(&self) -> impl Iterator<Item = (&LabelSet, &LabelSet)> {
        self.running_task_base_labels
            .iter()
            .zip(self.running_worker_labels.iter())
    }

    /// Iterate the base labels of every task, waiting first, then running.
    pub fn task_base_labels(&self) -> impl Iterator<Item = &LabelSet> {
        self.waiting_task_base_labels
            .iter()
            .chain(self.running_task_base_labels.iter())
    }

    /// Returns `true` if the digest holds no task and no worker.
    pub fn is_empty(&self) -> bool {
        self.waiting_task_base_labels.is_empty()
            && self.running_task_base_labels.is_empty()
            && self.idle_worker_labels.is_empty()
            && self.running_worker_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_digest_is_empty() {
        let digest = LabelDigest::new();
        assert!(digest.is_empty());
        assert_eq!(digest.running_pairs().count(), 0);
    }

    #[test]
    fn any_entry_makes_digest_non_empty() {
        let mut idle = LabelDigest::new();
        idle.push_idle(["pool:A"]);
        assert!(!idle.is_empty());

        let mut running = LabelDigest::new();
        running.push_running(Vec::<String>::new(), ["pool:A"]);
        assert!(running.running_task_base_labels()[0].is_empty());
        assert!(!running.is_empty());
    }

    #[test]
    fn push_running_keeps_halves_aligned() {
        let mut digest = LabelDigest::new();
        digest.push_running(["pool:A"], ["pool:A", "os:linux"]);
        digest.push_running(["pool:B"], ["pool:B"]);

        assert_eq!(digest.running_task_base_labels().len(), 2);
        assert_eq!(digest.running_worker_labels().len(), 2);

        let pairs: Vec<_> = digest.running_pairs().collect();
        assert!(pairs[0].0.contains("pool:A"));
        assert!(pairs[0].1.contains("os:linux"));
        assert!(pairs[1].0.contains("pool:B"));
    }

    #[test]
    fn duplicate_labels_collapse_within_one_entry() {
        let mut digest = LabelDigest::new();
        digest.push_waiting(["pool:A", "pool:A"]);

        assert_eq!(digest.waiting_task_base_labels()[0].len(), 1);
    }

    #[test]
    fn task_base_labels_chains_waiting_then_running() {
        let mut digest = LabelDigest::new();
        digest.push_waiting(["w"]);
        digest.push_running(["r"], ["bot"]);
        digest.push_idle(["idle"]);

        let all: Vec<_> = digest
            .task_base_labels()
            .flat_map(|set| set.iter().cloned())
            .collect();
        assert_eq!(all, vec!["w".to_string(), "r".to_string()]);
    }

    #[test]
    fn serializes_camel_case() {
        let mut digest = LabelDigest::new();
        digest.push_idle(["os:linux"]);

        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.contains("\"idleWorkerLabels\":[[\"os:linux\"]]"));
        assert!(json.contains("\"waitingTaskBaseLabels\":[]"));
    }
}
