//! Read-only view over a scheduler's live state.
//!
//! The digest builder only needs these accessors, so any scheduler representation
//! (the in-memory [`crate::SchedulerSnapshot`], a test double, a live engine) can feed it.

/// A task request known to the scheduler.
pub trait RequestView {
    /// Dimensions fixed for this request across all of its slices.
    fn base_labels(&self) -> &[String];
}

/// A bot known to the scheduler.
pub trait WorkerView {
    type Request: RequestView;

    /// Returns `true` if the worker has no running request.
    fn is_idle(&self) -> bool;

    /// Dimensions currently advertised by the worker.
    fn labels(&self) -> &[String];

    /// The request the worker executes, `None` when idle.
    fn running_request(&self) -> Option<&Self::Request>;
}

/// Scheduler state as seen by label accounting.
pub trait SchedulerView {
    type Request: RequestView;
    type Worker: WorkerView<Request = Self::Request>;

    /// Requests not yet assigned to a worker.
    fn waiting_requests(&self) -> impl Iterator<Item = &Self::Request>;

    /// All workers, idle and running.
    fn workers(&self) -> impl Iterator<Item = &Self::Worker>;
}
