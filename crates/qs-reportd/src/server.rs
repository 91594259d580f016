use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use qs_prometheus::{Encoder, LabelMetrics, TextEncoder};
use tracing::warn;

pub fn router(metrics: LabelMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<LabelMetrics>) -> Response {
    match metrics.encode_text() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics").into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use qs_model::{LabelUtilization, UtilizationMap};

    #[tokio::test]
    async fn metrics_handler_renders_gauges() {
        let metrics = LabelMetrics::new().unwrap();
        let mut map = UtilizationMap::new();
        map.insert("pool:A".to_string(), LabelUtilization::default());
        metrics.observe("s1", &map);

        let response = metrics_handler(State(metrics)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health_handler().await, "OK");
    }
}
