//! ittia-check Core
//!
//! Foundational types for the ittia fact-check client. This crate has no
//! dependency on an HTTP stack or async runtime.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `config` - Check configuration and its validating builder
//! - `proxy` - Proxy configuration data types
//! - `streaming` - Stage event type and extraction outcomes
//! - `demux` - Incremental extraction of concatenated JSON objects
//!
//! ## Design Principles
//!
//! 1. **No I/O** - the demultiplexer consumes text/bytes handed to it and nothing else
//! 2. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod config;
pub mod demux;
pub mod error;
pub mod proxy;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Configuration ──────────────────────────────────────────────────────
pub use config::{
    CheckConfig, CheckConfigBuilder, ReturnFormat, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS,
};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};

// ── Stage Stream ───────────────────────────────────────────────────────
pub use demux::{split_first_object, StageDemuxer};
pub use streaming::{ExtractError, StageEvent, FINAL_STAGE};
