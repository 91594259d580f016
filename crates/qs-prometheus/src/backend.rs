use prometheus::{Encoder, IntGaugeVec, Opts, Registry, TextEncoder, proto::MetricFamily};
use qs_core::StateCounts;
use qs_model::UtilizationMap;
use tracing::trace;

use crate::error::MetricsError;

const LABEL_KEYS: &[&str] = &["scheduler_id", "label"];
const STATE_KEYS: &[&str] = &["scheduler_id", "state"];

/// Gauge set for label utilization, registered in its own [`Registry`].
///
/// Cloning is cheap and every clone updates the same gauges.
#[derive(Clone)]
pub struct LabelMetrics {
    registry: Registry,
    running_bots: IntGaugeVec,
    idle_bots: IntGaugeVec,
    running_requests: IntGaugeVec,
    waiting_requests: IntGaugeVec,
    state_entities: IntGaugeVec,
}

impl LabelMetrics {
    /// Create the gauges in a fresh registry.
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new())
    }

    /// Create the gauges and register them in `registry`.
    pub fn with_registry(registry: Registry) -> Result<Self, MetricsError> {
        let running_bots = gauge(
            "qscheduler_label_running_bots",
            "Running bots carrying the label",
            LABEL_KEYS,
        )?;
        let idle_bots = gauge(
            "qscheduler_label_idle_bots",
            "Idle bots carrying the label",
            LABEL_KEYS,
        )?;
        let running_requests = gauge(
            "qscheduler_label_running_requests",
            "Running requests with the label as a base label",
            LABEL_KEYS,
        )?;
        let waiting_requests = gauge(
            "qscheduler_label_waiting_requests",
            "Waiting requests with the label as a base label",
            LABEL_KEYS,
        )?;
        let state_entities = gauge(
            "qscheduler_state_entities",
            "Requests and workers per scheduling state (waiting, running, idle)",
            STATE_KEYS,
        )?;

        registry.register(Box::new(running_bots.clone()))?;
        registry.register(Box::new(idle_bots.clone()))?;
        registry.register(Box::new(running_requests.clone()))?;
        registry.register(Box::new(waiting_requests.clone()))?;
        registry.register(Box::new(state_entities.clone()))?;

        Ok(Self {
            registry,
            running_bots,
            idle_bots,
            running_requests,
            waiting_requests,
            state_entities,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Publish one utilization map; every label gets all four gauges set.
    pub fn observe(&self, scheduler_id: &str, utilization: &UtilizationMap) {
        for (label, u) in utilization {
            let keys = [scheduler_id, label.as_str()];
            self.running_bots
                .with_label_values(&keys)
                .set(clamp(u.running_bots));
            self.idle_bots.with_label_values(&keys).set(clamp(u.idle_bots));
            self.running_requests
                .with_label_values(&keys)
                .set(clamp(u.running_requests));
            self.waiting_requests
                .with_label_values(&keys)
                .set(clamp(u.waiting_requests));
        }
        trace!(scheduler_id, labels = utilization.len(), "label utilization exported");
    }

    pub fn observe_counts(&self, scheduler_id: &str, counts: StateCounts) {
        for (state, n) in [
            ("waiting", counts.waiting),
            ("running", counts.running),
            ("idle", counts.idle),
        ] {
            self.state_entities
                .with_label_values(&[scheduler_id, state])
                .set(clamp(n as u64));
        }
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn encode_text(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn gauge(name: &str, help: &str, keys: &[&str]) -> Result<IntGaugeVec, MetricsError> {
    Ok(IntGaugeVec::new(Opts::new(name, help), keys)?)
}

#[inline]
fn clamp(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qs_model::LabelUtilization;

    fn sample(n: u64) -> UtilizationMap {
        let mut map = UtilizationMap::new();
        map.insert(
            "pool:A".to_string(),
            LabelUtilization {
                running_bots: n,
                idle_bots: 0,
                running_requests: n,
                waiting_requests: 2 * n,
            },
        );
        map.insert("pool:B".to_string(), LabelUtilization::default());
        map
    }

    #[test]
    fn observe_sets_all_four_gauges() {
        let metrics = LabelMetrics::new().unwrap();
        metrics.observe("s1", &sample(1));

        let keys = ["s1", "pool:A"];
        assert_eq!(metrics.running_bots.with_label_values(&keys).get(), 1);
        assert_eq!(metrics.idle_bots.with_label_values(&keys).get(), 0);
        assert_eq!(metrics.running_requests.with_label_values(&keys).get(), 1);
        assert_eq!(metrics.waiting_requests.with_label_values(&keys).get(), 2);
    }

    #[test]
    fn zero_labels_are_exported_explicitly() {
        let metrics = LabelMetrics::new().unwrap();
        metrics.observe("s1", &sample(1));

        let text = metrics.encode_text().unwrap();
        let line = text
            .lines()
            .find(|l| l.starts_with("qscheduler_label_idle_bots{") && l.contains(r#"label="pool:B""#))
            .expect("gauge for pool:B");
        assert!(line.ends_with(" 0"));
    }

    #[test]
    fn later_observation_overwrites_value() {
        let metrics = LabelMetrics::new().unwrap();
        metrics.observe("s1", &sample(3));
        metrics.observe("s1", &sample(0));

        let keys = ["s1", "pool:A"];
        assert_eq!(metrics.waiting_requests.with_label_values(&keys).get(), 0);
    }

    #[test]
    fn state_counts_are_exported() {
        let metrics = LabelMetrics::new().unwrap();
        metrics.observe_counts(
            "s1",
            StateCounts {
                waiting: 4,
                running: 2,
                idle: 1,
            },
        );

        let text = metrics.encode_text().unwrap();
        assert!(text.contains(r#"qscheduler_state_entities{scheduler_id="s1",state="waiting"} 4"#));
        assert!(text.contains(r#"qscheduler_state_entities{scheduler_id="s1",state="idle"} 1"#));
    }

    #[test]
    fn registering_twice_in_one_registry_fails() {
        let registry = Registry::new();
        LabelMetrics::with_registry(registry.clone()).unwrap();
        assert!(matches!(
            LabelMetrics::with_registry(registry),
            Err(MetricsError::Prometheus(_))
        ));
    }

    #[test]
    fn clamp_saturates() {
        assert_eq!(clamp(u64::MAX), i64::MAX);
        assert_eq!(clamp(7), 7);
    }
}
