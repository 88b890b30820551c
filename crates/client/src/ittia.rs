//! ittia Checker
//!
//! Implementation of the FactChecker trait for the ittia check service.
//! Issues one streaming GET per check and resolves on the final stage.

use async_trait::async_trait;
use ittia_check_core::CheckConfig;
use serde_json::Value;
use tracing::{error, info};

use super::provider::{parse_http_error, CheckOptions, FactChecker};
use super::types::{CheckError, CheckResult};
use crate::http_client::build_http_client;
use crate::resolver::VerdictResolver;

/// Percent-encode a query for use as a single path segment.
///
/// Everything except ASCII alphanumerics and `-_.~` is escaped, so `/`, `?`,
/// `#` and `%` in the query can never alter the request path.
pub fn encode_query(query: &str) -> String {
    urlencoding::encode(query).into_owned()
}

/// HTTP-backed fact checker
pub struct IttiaChecker {
    config: CheckConfig,
    client: reqwest::Client,
}

impl IttiaChecker {
    /// Create a checker with the given configuration
    pub fn new(config: CheckConfig) -> CheckResult<Self> {
        config.validate()?;
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    /// Full request URL for a query.
    pub fn request_url(&self, query: &str) -> String {
        self.config.request_url(&encode_query(query))
    }

    async fn open_stream(&self, url: &str) -> CheckResult<reqwest::Response> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status.as_u16(), &body));
        }

        Ok(response)
    }
}

#[async_trait]
impl FactChecker for IttiaChecker {
    fn name(&self) -> &'static str {
        "ittia"
    }

    fn config(&self) -> &CheckConfig {
        &self.config
    }

    async fn check_with(&self, query: &str, options: CheckOptions) -> CheckResult<Option<Value>> {
        let url = self.request_url(query);
        info!(format = %self.config.format, query_len = query.len(), "starting fact check");

        let opened = match &options.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(CheckError::Cancelled),
                response = self.open_stream(&url) => response,
            },
            None => self.open_stream(&url).await,
        };

        let response = match opened {
            Ok(response) => response,
            Err(e) => {
                if e.is_transport() {
                    error!(error = %e, "Error during API call");
                }
                return Err(e);
            }
        };

        let mut resolver = VerdictResolver::new();
        if let Some(tx) = options.progress {
            resolver = resolver.with_progress(tx);
        }
        if let Some(token) = options.cancellation_token {
            resolver = resolver.with_cancellation(token);
        }

        let result = resolver.resolve(response.bytes_stream()).await;
        if let Err(e) = &result {
            if e.is_transport() {
                error!(error = %e, "Error while reading check stream");
            }
        }
        result
    }
}
