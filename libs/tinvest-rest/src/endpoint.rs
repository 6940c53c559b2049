use std::fmt;
use std::marker::PhantomData;

use http::Method;

/// Static description of one REST endpoint.
///
/// `R` is the response shape the endpoint decodes into. Descriptors carry
/// no per-call data and are meant to be declared as `const` items:
///
/// ```
/// use tinvest_rest::{Endpoint, EmptyResponse};
///
/// const CLEAR: Endpoint<EmptyResponse> = Endpoint::post("/sandbox/clear");
/// assert_eq!(CLEAR.path(), "/sandbox/clear");
/// ```
pub struct Endpoint<R> {
    method: Method,
    path: &'static str,
    response: PhantomData<fn() -> R>,
}

impl<R> Endpoint<R> {
    #[must_use]
    pub const fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            response: PhantomData,
        }
    }

    #[must_use]
    pub const fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the client's base URL, starting with `/`.
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }
}

impl<R> Clone for Endpoint<R> {
    fn clone(&self) -> Self {
        Self::new(self.method.clone(), self.path)
    }
}

impl<R> fmt::Debug for Endpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

impl<R> fmt::Display for Endpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
