use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    time::Duration,
};

use qs_core::{LabelUtilizationCounter, SchedulerSnapshot, StateCounts, build_digest};
use qs_model::{LabelDigest, SchedulerId};
use qs_prometheus::LabelMetrics;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs digest, compute and export for every scheduler snapshot on disk.
pub struct Reporter {
    counter: LabelUtilizationCounter,
    metrics: LabelMetrics,
    snapshot_dir: PathBuf,
    /// Schedulers exported by the previous cycle.
    reported: BTreeSet<SchedulerId>,
}

impl Reporter {
    pub fn new(
        counter: LabelUtilizationCounter,
        metrics: LabelMetrics,
        snapshot_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            counter,
            metrics,
            snapshot_dir: snapshot_dir.into(),
            reported: BTreeSet::new(),
        }
    }

    /// Report every readable snapshot once. Returns the number of schedulers reported.
    ///
    /// Unreadable or malformed snapshots are logged and skipped. A scheduler reported by
    /// the previous cycle but absent from this one has all its gauges set to zero.
    pub async fn run_cycle(&mut self) -> usize {
        let snapshots = match load_snapshots(&self.snapshot_dir).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(dir = %self.snapshot_dir.display(), error = %e, "cannot list snapshots");
                Vec::new()
            }
        };

        let current: BTreeSet<SchedulerId> = snapshots.iter().map(|(id, _)| id.clone()).collect();
        for scheduler_id in self.reported.difference(&current) {
            self.clear(scheduler_id);
        }

        let reported = snapshots.len();
        for (scheduler_id, snapshot) in snapshots {
            self.report(&scheduler_id, snapshot);
        }
        self.reported = current;
        reported
    }

    fn report(&self, scheduler_id: &str, mut snapshot: SchedulerSnapshot) {
        for (request, e) in snapshot.resolve_slices() {
            warn!(scheduler_id, request = %request, error = %e, "rejected malformed task");
        }

        let digest = build_digest(&snapshot);
        let utilization = self.counter.compute(scheduler_id, &digest);
        self.metrics.observe(scheduler_id, &utilization);
        self.metrics.observe_counts(scheduler_id, snapshot.counts());

        debug!(scheduler_id, labels = utilization.len(), "scheduler reported");
    }

    // An empty digest still yields every known label, so each one drops to zero.
    fn clear(&self, scheduler_id: &str) {
        let utilization = self.counter.compute(scheduler_id, &LabelDigest::new());
        self.metrics.observe(scheduler_id, &utilization);
        self.metrics.observe_counts(scheduler_id, StateCounts::default());

        info!(scheduler_id, labels = utilization.len(), "scheduler snapshot gone, gauges zeroed");
    }
}

/// Run [`Reporter::run_cycle`] every `interval` until `token` is cancelled.
pub async fn run(mut reporter: Reporter, interval: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("reporter stopped");
                return;
            }
            _ = ticker.tick() => {
                let n = reporter.run_cycle().await;
                debug!(schedulers = n, "report cycle finished");
            }
        }
    }
}

/// Load `<scheduler_id>.json` files from `dir`, sorted by scheduler ID.
async fn load_snapshots(dir: &Path) -> std::io::Result<Vec<(String, SchedulerSnapshot)>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut out = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(scheduler_id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read snapshot");
                continue;
            }
        };
        match serde_json::from_str::<SchedulerSnapshot>(&raw) {
            Ok(snapshot) => out.push((scheduler_id.to_string(), snapshot)),
            Err(e) => warn!(path = %path.display(), error = %e, "malformed snapshot"),
        }
    }

    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}
