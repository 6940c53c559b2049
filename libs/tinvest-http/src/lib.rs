#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Async HTTP transport for the `TInvest` API clients
//!
//! A hyper-based client wrapped in a small tower stack:
//! - TLS via rustls (HTTPS only unless explicitly relaxed for mock servers)
//! - Connection pooling owned by hyper-util
//! - Per-request timeout
//! - User-Agent injection
//! - Optional static bearer token
//! - Transparent response decompression (gzip, brotli, deflate)
//!
//! The client never retries and never follows redirects: every call made
//! through it maps to exactly one outbound request.
//!
//! # Example
//!
//! ```ignore
//! use tinvest_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .bearer_token("t.sandbox-token")
//!     .build()?;
//!
//! let data: MyData = client
//!     .post("https://api-invest.tinkoff.ru/openapi/sandbox/sandbox/clear")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{BearerTokenLayer, BearerTokenService, UserAgentLayer, UserAgentService};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody};
