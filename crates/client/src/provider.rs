//! Fact Checker Trait
//!
//! Defines the common interface for fact-check backends.

use async_trait::async_trait;
use ittia_check_core::{CheckConfig, StageEvent};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::types::{CheckError, CheckResult};

/// Per-invocation options for a check.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Receives every stage as it is extracted, including the final one
    pub progress: Option<mpsc::Sender<StageEvent>>,
    /// Cancels the in-flight request when triggered
    pub cancellation_token: Option<CancellationToken>,
}

/// Trait that all fact-check backends must implement.
///
/// One call is one isolated check: implementations keep no stream state
/// between calls, so a single checker may serve concurrent checks.
#[async_trait]
pub trait FactChecker: Send + Sync {
    /// Returns the backend name for identification.
    fn name(&self) -> &'static str;

    /// Get the configuration for this checker.
    fn config(&self) -> &CheckConfig;

    /// Check a query with explicit options.
    ///
    /// # Returns
    /// The final stage's content, or `None` if the service never emitted one.
    async fn check_with(&self, query: &str, options: CheckOptions) -> CheckResult<Option<Value>>;

    /// Check a query.
    async fn check(&self, query: &str) -> CheckResult<Option<Value>> {
        self.check_with(query, CheckOptions::default()).await
    }

    /// Check a query, streaming intermediate stages to `tx`.
    async fn check_with_progress(
        &self,
        query: &str,
        tx: mpsc::Sender<StageEvent>,
    ) -> CheckResult<Option<Value>> {
        let options = CheckOptions {
            progress: Some(tx),
            ..Default::default()
        };
        self.check_with(query, options).await
    }

    /// Check a query that can be aborted through `token`.
    async fn check_with_cancel(
        &self,
        query: &str,
        token: CancellationToken,
    ) -> CheckResult<Option<Value>> {
        let options = CheckOptions {
            cancellation_token: Some(token),
            ..Default::default()
        };
        self.check_with(query, options).await
    }
}

/// Map a non-success HTTP status and its body to a [`CheckError`].
pub fn parse_http_error(status: u16, body: &str) -> CheckError {
    let message = if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        body.trim().to_string()
    };

    match status {
        404 => CheckError::NotFound { message },
        408 => CheckError::Timeout { message },
        429 => CheckError::RateLimited { message },
        400..=499 => CheckError::InvalidRequest {
            message,
            status: Some(status),
        },
        500..=599 => CheckError::ServerError {
            message,
            status: Some(status),
        },
        _ => CheckError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
