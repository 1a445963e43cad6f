// web-server/src/middleware/cors.rs
use actix_cors::Cors;
use actix_web::http::{header::HeaderName, Method};
use common::CorsConfig;
use url::Url;

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

/// A browser `Origin` value: scheme, host and optional port, nothing else
fn is_valid_origin(origin: &str) -> bool {
    match Url::parse(origin) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https") && url.origin().ascii_serialization() == origin
        }
        Err(_) => false,
    }
}

/// CORS policy for the browser frontend; `*` entries mean "any"
pub fn cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default().max_age(3600).block_on_origin_mismatch(true);

    if is_wildcard(&config.allow_origins) {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allow_origins {
            if is_valid_origin(origin) {
                cors = cors.allowed_origin(origin);
            } else {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
            }
        }
    }

    if is_wildcard(&config.allow_methods) {
        cors = cors.allow_any_method();
    } else {
        let methods: Vec<Method> = config
            .allow_methods
            .iter()
            .filter_map(|m| match Method::from_bytes(m.to_uppercase().as_bytes()) {
                Ok(method) => Some(method),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS method {}", m);
                    None
                }
            })
            .collect();
        cors = cors.allowed_methods(methods);
    }

    if is_wildcard(&config.allow_headers) {
        cors = cors.allow_any_header();
    } else {
        let headers: Vec<HeaderName> = config
            .allow_headers
            .iter()
            .filter_map(|h| match HeaderName::try_from(h.as_str()) {
                Ok(name) => Some(name),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS header {}", h);
                    None
                }
            })
            .collect();
        cors = cors.allowed_headers(headers);
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
