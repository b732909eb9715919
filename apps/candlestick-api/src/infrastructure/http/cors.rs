//! CORS layer construction.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::infrastructure::config::{AllowList, CorsSettings};

/// Build the CORS layer for a policy.
///
/// Browsers refuse a literal `*` together with credentials, so a wildcard
/// combined with `allow_credentials` mirrors the request's origin, method
/// and headers instead. Unparseable list entries are skipped with a warning.
#[must_use]
pub fn build_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let credentials = settings.allow_credentials;

    let origins = match &settings.allowed_origins {
        AllowList::Any if credentials => AllowOrigin::mirror_request(),
        AllowList::Any => AllowOrigin::from(Any),
        AllowList::List(items) => AllowOrigin::list(parse_items::<HeaderValue>(items, "origin")),
    };

    let methods = match &settings.allowed_methods {
        AllowList::Any if credentials => AllowMethods::mirror_request(),
        AllowList::Any => AllowMethods::from(Any),
        AllowList::List(items) => AllowMethods::list(parse_items::<Method>(items, "method")),
    };

    let headers = match &settings.allowed_headers {
        AllowList::Any if credentials => AllowHeaders::mirror_request(),
        AllowList::Any => AllowHeaders::from(Any),
        AllowList::List(items) => AllowHeaders::list(parse_items::<HeaderName>(items, "header")),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
}

fn parse_items<T>(items: &[String], kind: &str) -> Vec<T>
where
    T: std::str::FromStr,
{
    items
        .iter()
        .filter_map(|item| {
            item.parse::<T>()
                .inspect_err(|_| tracing::warn!(kind, value = %item, "Ignoring invalid CORS entry"))
                .ok()
        })
        .collect()
}
