//! Shared test utilities for HTTP-level integration tests.
//!
//! Add `mod common;` to a test file, then build a provider pointed at an
//! `httpmock` server:
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//!
//! #[test]
//! fn test_example() {
//!     let server = MockServer::start();
//!     let provider = provider_for(&server);
//!     // ... register mocks and call the provider
//! }
//! ```

#![allow(dead_code)]

pub use httpmock::prelude::*;

use directus_provider::config::ProviderConfig;
use directus_provider::provider::Provider;

/// Token every mock expects in the `Authorization` header.
pub const TEST_TOKEN: &str = "test-token";

/// Route `log` output through `env_logger` in test mode.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config_for(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(server.base_url(), TEST_TOKEN)
}

pub fn provider_for(server: &MockServer) -> Provider {
    init_logging();
    Provider::configure(config_for(server)).expect("mock server config is valid")
}

pub fn bearer() -> String {
    format!("Bearer {}", TEST_TOKEN)
}
