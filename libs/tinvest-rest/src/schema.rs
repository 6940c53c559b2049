//! Response envelope shared by every OpenAPI endpoint.
//!
//! The brokerage wraps each body as
//! `{"trackingId": "...", "status": "Ok", "payload": {...}}`.

use serde::{Deserialize, Serialize};

/// Envelope status reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Typed response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<P> {
    /// Correlation id assigned by the brokerage
    pub tracking_id: String,
    pub status: ResponseStatus,
    pub payload: P,
}

/// Payload of endpoints that only acknowledge the call (`{}`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Acknowledgement with an empty payload
pub type EmptyResponse = ApiResponse<Empty>;

/// Payload of an `Error` envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
