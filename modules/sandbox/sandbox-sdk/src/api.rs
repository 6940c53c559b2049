use async_trait::async_trait;
use tinvest_rest::{EmptyResponse, RestError};

use crate::models::{BrokerAccountType, SandboxCurrency, SandboxRegisterResponse};

/// Sandbox operations of the `TInvest` OpenAPI.
///
/// Each method issues exactly one request. `broker_account_id` selects a
/// sub-account; `None` leaves the parameter out and the server falls back to
/// the default account.
#[async_trait]
pub trait SandboxClient: Send + Sync {
    /// Open a sandbox account. Without a type the server picks the default.
    async fn register(
        &self,
        broker_account_type: Option<BrokerAccountType>,
    ) -> Result<SandboxRegisterResponse, RestError>;

    /// Set the balance of one currency.
    async fn set_currency_balance(
        &self,
        currency: SandboxCurrency,
        balance: f64,
        broker_account_id: Option<&str>,
    ) -> Result<EmptyResponse, RestError>;

    /// Set the position of the instrument identified by `figi`.
    async fn set_position_balance(
        &self,
        figi: &str,
        balance: f64,
        broker_account_id: Option<&str>,
    ) -> Result<EmptyResponse, RestError>;

    /// Delete the sandbox account.
    async fn remove_account(&self, broker_account_id: Option<&str>)
    -> Result<EmptyResponse, RestError>;

    /// Drop every position and balance of the account.
    async fn clear_positions(
        &self,
        broker_account_id: Option<&str>,
    ) -> Result<EmptyResponse, RestError>;
}
