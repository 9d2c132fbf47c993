//! CORS (Cross-Origin Resource Sharing) middleware configuration

use crate::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer as TowerCorsLayer};

/// The site front-end only ever posts JSON to the relay, so preflights need
/// nothing beyond `POST` and `content-type`.
pub fn cors_layer_from_config(config: &CorsConfig) -> TowerCorsLayer {
    let max_age = std::time::Duration::from_secs(config.max_age_seconds);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return TowerCorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([HeaderName::from_static("content-type")])
            .max_age(max_age);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    TowerCorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
        ])
        .max_age(max_age)
}
