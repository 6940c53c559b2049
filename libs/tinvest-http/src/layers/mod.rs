//! Tower layers composed into the client stack.
//!
//! - [`UserAgentLayer`] - sets `User-Agent` unless the request already has one
//! - [`BearerTokenLayer`] - sets `Authorization: Bearer <token>` from a static token

mod bearer;
mod user_agent;

pub use bearer::{BearerTokenLayer, BearerTokenService};
pub use user_agent::{UserAgentLayer, UserAgentService};
