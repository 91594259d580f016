use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use qs_observe::{LoggerConfig, LoggerFormat};

const DEFAULT_SNAPSHOT_DIR: &str = "/var/lib/qscheduler/snapshots";
const DEFAULT_INTERVAL_MS: u64 = 60_000;
const DEFAULT_LISTEN: &str = "127.0.0.1:9464";

pub const ENV_SNAPSHOT_DIR: &str = "QS_SNAPSHOT_DIR";
pub const ENV_INTERVAL_MS: &str = "QS_INTERVAL_MS";
pub const ENV_LISTEN: &str = "QS_LISTEN";
pub const ENV_LOG_LEVEL: &str = "QS_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "QS_LOG_FORMAT";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory holding one `<scheduler_id>.json` snapshot per scheduler.
    pub snapshot_dir: PathBuf,
    pub interval_ms: u64,
    /// Address of the `/metrics` endpoint.
    pub listen: SocketAddr,
    pub logger: LoggerConfig,
}

impl ReportConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_dir = get(ENV_SNAPSHOT_DIR)
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_DIR.to_string())
            .into();

        let interval_ms = match get(ENV_INTERVAL_MS) {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_INTERVAL_MS}={v:?} is not a number"))?,
            None => DEFAULT_INTERVAL_MS,
        };
        if interval_ms == 0 {
            bail!("{ENV_INTERVAL_MS} must be greater than zero");
        }

        let listen = get(ENV_LISTEN)
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
            .parse::<SocketAddr>()
            .with_context(|| format!("{ENV_LISTEN} is not a socket address"))?;

        let mut logger = LoggerConfig::default();
        if let Some(level) = get(ENV_LOG_LEVEL) {
            logger = logger.with_level(level);
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            logger = logger.with_format(format.parse::<LoggerFormat>()?);
        }

        Ok(Self {
            snapshot_dir,
            interval_ms,
            listen,
            logger,
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<ReportConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReportConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.snapshot_dir, PathBuf::from(DEFAULT_SNAPSHOT_DIR));
        assert_eq!(cfg.interval(), Duration::from_secs(60));
        assert_eq!(cfg.listen.port(), 9464);
        assert_eq!(cfg.logger.level, "info");
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            (ENV_SNAPSHOT_DIR, "/tmp/snaps"),
            (ENV_INTERVAL_MS, "1500"),
            (ENV_LISTEN, "0.0.0.0:9000"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FORMAT, "json"),
        ])
        .unwrap();
        assert_eq!(cfg.snapshot_dir, PathBuf::from("/tmp/snaps"));
        assert_eq!(cfg.interval_ms, 1500);
        assert_eq!(cfg.listen.port(), 9000);
        assert_eq!(cfg.logger.level, "debug");
        assert_eq!(cfg.logger.format, LoggerFormat::Json);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load(&[(ENV_INTERVAL_MS, "soon")]).is_err());
        assert!(load(&[(ENV_INTERVAL_MS, "0")]).is_err());
        assert!(load(&[(ENV_LISTEN, "not-an-addr")]).is_err());
        assert!(load(&[(ENV_LOG_FORMAT, "xml")]).is_err());
    }
}
