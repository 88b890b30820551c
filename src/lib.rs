//! ittia-check
//!
//! Client for the ittia fact-check service. A check issues one streaming GET,
//! splits the response into stage objects and returns the content of the
//! stage marked `"final"`.
//!
//! ```no_run
//! use ittia_check::{CheckConfig, FactChecker, IttiaChecker, ReturnFormat};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CheckConfig::builder().format(ReturnFormat::Json).build()?;
//! let checker = IttiaChecker::new(config)?;
//! if let Some(verdict) = checker.check("Germany hosted the 2024 Olympics").await? {
//!     println!("{verdict}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;

pub use ittia_check_client::{
    build_http_client, encode_query, parse_http_error, CheckError, CheckOptions, CheckResult,
    FactChecker, IttiaChecker, VerdictResolver,
};
pub use ittia_check_core::{
    split_first_object, CheckConfig, CheckConfigBuilder, CoreError, CoreResult, ExtractError,
    ProxyConfig, ProxyProtocol, ReturnFormat, StageDemuxer, StageEvent, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_MS, FINAL_STAGE,
};
