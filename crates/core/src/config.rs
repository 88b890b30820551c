//! Check Configuration
//!
//! Immutable configuration for a fact-check client plus a validating builder.
//!
//! The builder follows the standard Rust builder pattern:
//! 1. Create with `::new()` or `::default()`
//! 2. Chain `.field(value)` calls
//! 3. Call `.build()` which validates and returns `CoreResult<CheckConfig>`

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::proxy::ProxyConfig;

/// Default fact-check service endpoint
pub const DEFAULT_BASE_URL: &str = "https://check.ittia.net";

/// Default request timeout. Checks can run for several minutes server-side.
pub const DEFAULT_TIMEOUT_MS: u64 = 600_000;

/// Response format requested through the `X-Return-Format` header.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFormat {
    /// Final content is a markdown string
    #[default]
    Markdown,
    /// Final content is a structured JSON value
    Json,
}

impl ReturnFormat {
    /// Header value sent to the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnFormat::Markdown => "markdown",
            ReturnFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReturnFormat::Markdown),
            "json" => Ok(ReturnFormat::Json),
            other => Err(CoreError::parse(format!(
                "unknown return format '{}', expected 'markdown' or 'json'",
                other
            ))),
        }
    }
}

/// Configuration for one fact-check client. Never mutated after construction.
///
/// Values that did not come from [`CheckConfigBuilder::build`] (for example a
/// deserialized config) must pass [`validate`](Self::validate) before use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// Service base URL, without the query path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Requested response format
    #[serde(default)]
    pub format: ReturnFormat,
    /// Overall request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Optional outbound proxy; `None` connects directly
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proxy: Option<ProxyConfig>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            format: ReturnFormat::default(),
            timeout_ms: default_timeout_ms(),
            proxy: None,
        }
    }
}

impl CheckConfig {
    /// Start a validating builder.
    pub fn builder() -> CheckConfigBuilder {
        CheckConfigBuilder::new()
    }

    /// Check the invariants [`CheckConfigBuilder::build`] enforces.
    pub fn validate(&self) -> CoreResult<()> {
        let parsed = Url::parse(&self.base_url).map_err(|e| {
            CoreError::validation(format!(
                "base_url '{}' is not a valid URL: {}",
                self.base_url, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::validation(format!(
                "base_url must use http or https. Got: '{}'",
                parsed.scheme()
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(CoreError::validation(
                "base_url must not contain a query string or fragment",
            ));
        }
        if self.timeout_ms == 0 {
            return Err(CoreError::validation("timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// The request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build the request URL for a query: `{base_url}/{encoded_query}`.
    ///
    /// `encoded_query` must already be percent-encoded; it is appended verbatim.
    pub fn request_url(&self, encoded_query: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), encoded_query)
    }
}

/// Builder for [`CheckConfig`].
#[derive(Debug, Default)]
pub struct CheckConfigBuilder {
    base_url: Option<String>,
    format: Option<ReturnFormat>,
    timeout_ms: Option<u64>,
    proxy: Option<ProxyConfig>,
}

impl CheckConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service base URL (must be an absolute http/https URL).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the response format.
    pub fn format(mut self, format: ReturnFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the request timeout in milliseconds (must be > 0).
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Set the request timeout.
    pub fn timeout(self, timeout: Duration) -> Self {
        let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.timeout_ms(ms)
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> CoreResult<CheckConfig> {
        let config = CheckConfig {
            base_url: self.base_url.unwrap_or_else(default_base_url),
            format: self.format.unwrap_or_default(),
            timeout_ms: self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            proxy: self.proxy,
        };
        config.validate()?;
        Ok(config)
    }
}
