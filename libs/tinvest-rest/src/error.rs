use serde::Deserialize;
use thiserror::Error;
use tinvest_http::HttpError;

use crate::schema::ApiErrorPayload;

/// Errors returned by [`RestClient`](crate::RestClient)
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestError {
    /// Transport failure, non-2xx status, or a body that does not match the
    /// expected shape
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Base URL joined with the endpoint path is not a valid URL
    #[error("invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Query parameters could not be form-encoded
    #[error("failed to encode query parameters: {0}")]
    QueryEncode(#[from] serde_urlencoded::ser::Error),

    /// A call argument was rejected before any request was sent
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    payload: ApiErrorPayload,
}

impl RestError {
    /// HTTP status of a non-2xx response, if that is what failed.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Server-side error message parsed from a non-2xx response body.
    ///
    /// Returns `None` for other failures, or when the body is not a
    /// brokerage error envelope.
    #[must_use]
    pub fn api_error(&self) -> Option<ApiErrorPayload> {
        match self {
            Self::Http(HttpError::HttpStatus { body_preview, .. }) => {
                serde_json::from_str::<ErrorEnvelope>(body_preview)
                    .ok()
                    .map(|envelope| envelope.payload)
            }
            _ => None,
        }
    }
}
