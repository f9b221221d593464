//! HTTP client utilities

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const SHORT_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent sent with every backend request.
pub const USER_AGENT: &str = concat!("initctx/", env!("CARGO_PKG_VERSION"));

/// Create a default HTTP client with standard timeouts
pub fn create_default_client() -> Client {
    create_client_with_timeouts(SHORT_TIMEOUT, DEFAULT_TIMEOUT)
}

/// Create an HTTP client with custom connect and request timeouts
pub fn create_client_with_timeouts(connect_timeout: Duration, request_timeout: Duration) -> Client {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}
