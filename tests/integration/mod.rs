//! Integration Tests Module
//!
//! End-to-end tests for ittia-check. A wiremock server stands in for the
//! fact-check service; everything else (HTTP client, demultiplexer, resolver)
//! is real.

// Full check round trips against a mock service
mod check_test;
