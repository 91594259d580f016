//! Periodically publishes scheduler label utilization as Prometheus gauges.

mod config;
mod report;
mod server;

use qs_core::LabelUtilizationCounter;
use qs_observe::logger_init;
use qs_prometheus::LabelMetrics;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{config::ReportConfig, report::Reporter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = ReportConfig::from_env()?;
    logger_init(&cfg.logger)?;
    info!(
        dir = %cfg.snapshot_dir.display(),
        interval_ms = cfg.interval_ms,
        listen = %cfg.listen,
        "qs-reportd starting"
    );

    let counter = LabelUtilizationCounter::new();
    let metrics = LabelMetrics::new()?;
    let token = CancellationToken::new();

    let reporter = Reporter::new(counter, metrics.clone(), cfg.snapshot_dir.clone());
    let report_task = tokio::spawn(report::run(reporter, cfg.interval(), token.clone()));

    let listener = tokio::net::TcpListener::bind(cfg.listen).await?;
    info!(addr = %cfg.listen, "serving /metrics");
    let shutdown = token.clone();
    let server_task = tokio::spawn(async move {
        axum::serve(listener, server::router(metrics))
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
    });

    tokio::signal::ctrl_c().await?;
    info!("shutting down...");
    token.cancel();

    report_task.await?;
    if let Err(e) = server_task.await? {
        warn!(error = %e, "metrics server exited with error");
    }
    Ok(())
}
