//! Relay service
//!
//! Holds the provider credential so the browser extension does not have to,
//! and adds response caching and a global rate limit in front of the model.

pub mod cache;
pub mod config;
pub mod http;
pub mod rate_limit;
pub mod server;
pub mod service;

pub use cache::{cache_key, ResponseCache};
pub use config::RelayConfig;
pub use rate_limit::RateLimiter;
pub use server::{serve, RelayState};
pub use service::RelayService;
