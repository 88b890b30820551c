//! ittia-check Client
//!
//! Streaming client for the ittia fact-check service:
//! - `FactChecker` trait and its HTTP implementation `IttiaChecker`
//! - `VerdictResolver`, which consumes the stage stream and stops at the final stage
//! - HTTP client factory and error taxonomy

pub mod http_client;
pub mod ittia;
pub mod provider;
pub mod resolver;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use ittia::{encode_query, IttiaChecker};
pub use provider::{parse_http_error, CheckOptions, FactChecker};
pub use resolver::VerdictResolver;
pub use types::{CheckError, CheckResult};
