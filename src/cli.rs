//! Command-line interface for the `ittia-check` binary.

use clap::Parser;
use serde_json::Value;

use ittia_check_core::{
    CheckConfig, CoreResult, ProxyConfig, ReturnFormat, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS,
};

#[derive(Debug, Parser)]
#[command(name = "ittia-check", about = "Fact-check a statement with the ittia service")]
pub struct Cli {
    /// Statement to check. Multiple words are joined with spaces.
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Service base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "ITTIA_BASE_URL")]
    pub base_url: String,

    /// Response format: markdown or json
    #[arg(long, default_value = "markdown", env = "ITTIA_FORMAT")]
    pub format: ReturnFormat,

    /// Overall request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS, env = "ITTIA_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Proxy URL, e.g. socks5://127.0.0.1:1080
    #[arg(long, env = "ITTIA_PROXY")]
    pub proxy: Option<String>,

    /// Log every intermediate stage
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// The query words joined into one statement.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }

    /// Validated client configuration from the parsed arguments.
    pub fn to_config(&self) -> CoreResult<CheckConfig> {
        let mut builder = CheckConfig::builder()
            .base_url(self.base_url.clone())
            .format(self.format)
            .timeout_ms(self.timeout_ms);
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(ProxyConfig::parse(proxy)?);
        }
        builder.build()
    }
}

/// Render final content for stdout: strings verbatim, anything else as pretty JSON.
pub fn render_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
