use qs_model::LabelDigest;
use tracing::{trace, warn};

use crate::view::{RequestView, SchedulerView, WorkerView};

/// Condense a scheduler's state into a [`LabelDigest`].
///
/// Order follows the order in which the view yields requests and workers.
/// A worker reported as busy without a running request is counted as idle.
pub fn build_digest<S: SchedulerView>(state: &S) -> LabelDigest {
    let mut digest = LabelDigest::new();

    for request in state.waiting_requests() {
        digest.push_waiting(request.base_labels().iter().cloned());
    }

    for worker in state.workers() {
        let labels = worker.labels().iter().cloned();
        if worker.is_idle() {
            digest.push_idle(labels);
            continue;
        }
        match worker.running_request() {
            Some(request) => digest.push_running(request.base_labels().iter().cloned(), labels),
            None => {
                warn!("worker is not idle but has no running request; counting it as idle");
                digest.push_idle(labels);
            }
        }
    }

    trace!(
        waiting = digest.waiting_task_base_labels().len(),
        running = digest.running_worker_labels().len(),
        idle = digest.idle_worker_labels().len(),
        "label digest built"
    );
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Req(Vec<String>);

    impl RequestView for Req {
        fn base_labels(&self) -> &[String] {
            &self.0
        }
    }

    struct Bot {
        labels: Vec<String>,
        busy: bool,
        running: Option<Req>,
    }

    impl WorkerView for Bot {
        type Request = Req;

        fn is_idle(&self) -> bool {
            !self.busy
        }
        fn labels(&self) -> &[String] {
            &self.labels
        }
        fn running_request(&self) -> Option<&Req> {
            self.running.as_ref()
        }
    }

    struct State {
        waiting: Vec<Req>,
        workers: Vec<Bot>,
    }

    impl SchedulerView for State {
        type Request = Req;
        type Worker = Bot;

        fn waiting_requests(&self) -> impl Iterator<Item = &Req> {
            self.waiting.iter()
        }
        fn workers(&self) -> impl Iterator<Item = &Bot> {
            self.workers.iter()
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_workers_into_idle_and_running() {
        let state = State {
            waiting: vec![Req(strings(&["pool:A"]))],
            workers: vec![
                Bot {
                    labels: strings(&["pool:A", "os:linux"]),
                    busy: true,
                    running: Some(Req(strings(&["pool:A"]))),
                },
                Bot {
                    labels: strings(&["pool:B"]),
                    busy: false,
                    running: None,
                },
            ],
        };

        let digest = build_digest(&state);
        assert_eq!(digest.waiting_task_base_labels().len(), 1);
        assert_eq!(digest.idle_worker_labels().len(), 1);
        assert!(digest.idle_worker_labels()[0].contains("pool:B"));

        let pairs: Vec<_> = digest.running_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].0.contains("pool:A"));
        assert!(pairs[0].1.contains("os:linux"));
    }

    #[test]
    fn busy_worker_without_request_counts_as_idle() {
        let state = State {
            waiting: vec![],
            workers: vec![Bot {
                labels: strings(&["pool:A"]),
                busy: true,
                running: None,
            }],
        };

        let digest = build_digest(&state);
        assert_eq!(digest.idle_worker_labels().len(), 1);
        assert!(digest.running_worker_labels().is_empty());
        assert!(digest.running_task_base_labels().is_empty());
    }

    #[test]
    fn empty_state_gives_empty_digest() {
        let state = State {
            waiting: vec![],
            workers: vec![],
        };
        assert!(build_digest(&state).is_empty());
    }
}
