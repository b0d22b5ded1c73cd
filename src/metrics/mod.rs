/// Prometheus metrics registry and helpers
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    static ref HTTP_REQUESTS_TOTAL: IntCounterVec = {
        let counter = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");
        REGISTRY
            .register(Box::new(counter.clone()))
            .expect("metric can be registered");
        counter
    };
}

pub fn record_http_request(method: &str, path: &str, status: &str) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status])
        .inc();
}

/// Render all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
