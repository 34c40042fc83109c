//! CORS from `[server.cors]`.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};

use carehub_core::config::CorsConfig;

/// Entries that do not parse are skipped with a warning rather than
/// failing startup.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if is_wildcard(&config.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parse_all::<HeaderValue>(&config.allowed_origins, "origin"))
    };
    let headers = if is_wildcard(&config.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(parse_all::<HeaderName>(&config.allowed_headers, "header"))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers(headers)
        .allow_methods(parse_all::<Method>(&config.allowed_methods, "method"))
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

fn parse_all<T: FromStr>(values: &[String], what: &str) -> Vec<T> {
    values
        .iter()
        .filter_map(|raw| {
            let parsed = raw.trim().parse().ok();
            if parsed.is_none() {
                tracing::warn!(value = %raw, kind = what, "Ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
