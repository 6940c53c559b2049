#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Typed REST core for the `TInvest` OpenAPI
//!
//! Endpoint groups declare each call as a `const` [`Endpoint`] and hand it to
//! [`RestClient::call`] together with serializable query and body values.
//! Every response arrives wrapped in the brokerage's [`ApiResponse`] envelope.
//!
//! ```ignore
//! use tinvest_rest::{Endpoint, EmptyResponse, RestClient, RestConfig};
//!
//! const CLEAR: Endpoint<EmptyResponse> = Endpoint::post("/sandbox/clear");
//!
//! let client = RestClient::new(RestConfig::default())?;
//! let ack = client.call(&CLEAR, &(), None::<&()>).await?;
//! println!("tracking id {}", ack.tracking_id);
//! ```

mod client;
mod config;
mod endpoint;
mod error;
mod schema;
mod secret;

pub use client::RestClient;
pub use config::{DEFAULT_BASE_URL, RestConfig};
pub use endpoint::Endpoint;
pub use error::RestError;
pub use schema::{ApiErrorPayload, ApiResponse, Empty, EmptyResponse, ResponseStatus};
pub use secret::SecretString;

pub use tinvest_http::{HttpClient, HttpClientBuilder, HttpError};
