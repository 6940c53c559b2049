use crate::error::HttpError;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Request, Response};
use std::fmt;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use zeroize::Zeroizing;

/// Tower layer that injects a fixed bearer token into every request.
///
/// The token is turned into a sensitive `HeaderValue` once, so it is never
/// formatted again on the request path. There is no refresh: the brokerage
/// issues long-lived API tokens.
#[derive(Clone)]
pub struct BearerTokenLayer {
    value: HeaderValue,
}

impl BearerTokenLayer {
    /// Create a layer that injects `Authorization: Bearer <token>`.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if the token contains characters
    /// that are not allowed in a header value.
    pub fn try_new(token: &str) -> Result<Self, HttpError> {
        let raw = Zeroizing::new(format!("Bearer {token}"));
        let mut value = HeaderValue::from_str(&raw)?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

impl fmt::Debug for BearerTokenLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenLayer")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl<S> Layer<S> for BearerTokenLayer {
    type Service = BearerTokenService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerTokenService {
            inner,
            value: self.value.clone(),
        }
    }
}

/// Service produced by [`BearerTokenLayer`]
#[derive(Clone)]
pub struct BearerTokenService<S> {
    inner: S,
    value: HeaderValue,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for BearerTokenService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        req.headers_mut()
            .insert(AUTHORIZATION, self.value.clone());
        self.inner.call(req)
    }
}
