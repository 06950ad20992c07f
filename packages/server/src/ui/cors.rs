//! CORS for the HTTP API.
//!
//! - no origins: no cross-origin access
//! - `*`: any origin, without credentials
//! - otherwise: exactly the listed origins

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    if allowed_origins.iter().any(|origin| origin.trim() == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins = parse_origins(allowed_origins);
    if origins.is_empty() {
        return base;
    }
    base.allow_origin(origins).allow_credentials(true)
}

fn parse_origins(allowed_origins: &[String]) -> Vec<HeaderValue> {
    allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect()
}
