#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Sandbox SDK for the `TInvest` OpenAPI.
//!
//! The sandbox simulates accounts, balances and positions without real
//! trades. [`SandboxClient`] lists its operations; [`RestSandboxClient`]
//! performs them over HTTP.
//!
//! ```ignore
//! use tinvest_sandbox_sdk::{RestSandboxClient, SandboxClient, SandboxCurrency};
//!
//! let sandbox = RestSandboxClient::from_config(config)?;
//! let account = sandbox.register(None).await?.payload;
//! sandbox
//!     .set_currency_balance(SandboxCurrency::Usd, 1_000.0, Some(&account.broker_account_id))
//!     .await?;
//! ```

pub mod api;
pub mod client;
pub mod errors;
pub mod models;

pub use api::SandboxClient;
pub use client::RestSandboxClient;
pub use errors::ParseModelError;
pub use models::{BrokerAccountType, SandboxAccount, SandboxCurrency, SandboxRegisterResponse};

pub use tinvest_rest::{EmptyResponse, RestConfig, RestError, SecretString};
