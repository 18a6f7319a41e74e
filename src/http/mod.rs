//! HTTP client module
//!
//! Provides the HTTP client shared by every remote reader and writer.
//!
//! # Features
//!
//! - **Error Classification**: non-2xx is a remote API error, everything
//!   else that fails is a transport error
//! - **Pacing**: optional fixed-interval limiter using governor
//! - **Authentication**: Integration with auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
