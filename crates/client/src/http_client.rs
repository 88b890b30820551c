//! HTTP Client Factory
//!
//! Builds the `reqwest` client used for check requests: default headers,
//! overall timeout and proxy routing come from the [`CheckConfig`].

use ittia_check_core::CheckConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

use crate::types::{CheckError, CheckResult};

/// Header selecting the response format (`X-Return-Format`).
pub const RETURN_FORMAT_HEADER: &str = "x-return-format";

/// `Accept` value the service expects for streamed responses.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Default headers sent with every check request.
pub fn default_headers(config: &CheckConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(RETURN_FORMAT_HEADER),
        HeaderValue::from_static(config.format.as_str()),
    );
    headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));
    headers
}

/// Build a `reqwest::Client` for the given configuration.
///
/// - `Some(proxy)` -> configure proxy on the client
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
pub fn build_http_client(config: &CheckConfig) -> CheckResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .default_headers(default_headers(config))
        .timeout(config.timeout());

    match &config.proxy {
        Some(cfg) => {
            let mut p = reqwest::Proxy::all(cfg.url()).map_err(|e| CheckError::Config {
                message: format!("invalid proxy {}: {}", cfg.url(), e),
            })?;
            if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }

    builder.build().map_err(|e| CheckError::Config {
        message: format!("failed to build HTTP client: {}", e),
    })
}
