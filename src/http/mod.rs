//! HTTP transport module
//!
//! A thin layer over `reqwest` shared by every Baserow operation.
//!
//! # Features
//!
//! - **API URLs**: Paths are joined onto `<base_url>/api/`
//! - **Authentication**: Integration with the auth module
//! - **Error mapping**: 400 responses become structured `BadRequest` errors
//! - **Rate Limiting**: Optional token bucket limiter using governor
//!
//! Requests are never retried; failures surface immediately.

mod client;
mod rate_limit;

pub use client::{
    error_from_response, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestBody,
    RequestConfig,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
