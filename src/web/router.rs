//! Web application router and middleware setup.

use crate::metrics::MetricRegistry;
use crate::web::config::WebConfig;
use crate::web::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the axum application serving the registry.
pub fn create_app(config: &WebConfig, registry: Arc<MetricRegistry>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::metrics))
        .route("/health", get(handlers::health_check));

    if config.metrics_path != "/" {
        app = app.route(&config.metrics_path, get(handlers::metrics));
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(registry)
}
