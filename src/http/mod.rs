//! HTTP client module
//!
//! Thin wrapper over reqwest for the data API: base URL resolution, default
//! headers, query parameters and JSON bodies. Every request is sent exactly
//! once; non-2xx answers and transport failures are returned as errors.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
