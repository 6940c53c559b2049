use async_trait::async_trait;
use serde::Serialize;
use tinvest_rest::{EmptyResponse, Endpoint, RestClient, RestConfig, RestError};

use crate::api::SandboxClient;
use crate::models::{BrokerAccountType, SandboxCurrency, SandboxRegisterResponse};

pub const REGISTER: Endpoint<SandboxRegisterResponse> = Endpoint::post("/sandbox/register");
pub const CURRENCIES_BALANCE: Endpoint<EmptyResponse> =
    Endpoint::post("/sandbox/currencies/balance");
pub const POSITIONS_BALANCE: Endpoint<EmptyResponse> = Endpoint::post("/sandbox/positions/balance");
pub const REMOVE: Endpoint<EmptyResponse> = Endpoint::post("/sandbox/remove");
pub const CLEAR: Endpoint<EmptyResponse> = Endpoint::post("/sandbox/clear");

#[derive(Serialize)]
struct AccountQuery<'a> {
    #[serde(rename = "brokerAccountId", skip_serializing_if = "Option::is_none")]
    broker_account_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    broker_account_type: BrokerAccountType,
}

#[derive(Serialize)]
struct CurrencyBalanceBody {
    currency: SandboxCurrency,
    balance: f64,
}

#[derive(Serialize)]
struct PositionBalanceBody<'a> {
    figi: &'a str,
    balance: f64,
}

/// JSON has no encoding for NaN or infinity; serde would send `null`.
fn finite_balance(balance: f64) -> Result<f64, RestError> {
    if balance.is_finite() {
        Ok(balance)
    } else {
        Err(RestError::InvalidArgument {
            name: "balance",
            reason: format!("must be a finite number, got {balance}"),
        })
    }
}

/// [`SandboxClient`] over the REST API
#[derive(Clone, Debug)]
pub struct RestSandboxClient {
    rest: RestClient,
}

impl RestSandboxClient {
    #[must_use]
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// # Errors
    /// Returns an error if the REST client cannot be built from `config`.
    pub fn from_config(config: RestConfig) -> Result<Self, RestError> {
        Ok(Self::new(RestClient::new(config)?))
    }

    #[must_use]
    pub fn rest(&self) -> &RestClient {
        &self.rest
    }
}

#[async_trait]
impl SandboxClient for RestSandboxClient {
    async fn register(
        &self,
        broker_account_type: Option<BrokerAccountType>,
    ) -> Result<SandboxRegisterResponse, RestError> {
        let body = broker_account_type.map(|broker_account_type| RegisterBody {
            broker_account_type,
        });
        let resp = self.rest.call(&REGISTER, &(), body.as_ref()).await?;
        tracing::info!(
            broker_account_id = %resp.payload.broker_account_id,
            broker_account_type = %resp.payload.broker_account_type,
            "sandbox account registered"
        );
        Ok(resp)
    }

    async fn set_currency_balance(
        &self,
        currency: SandboxCurrency,
        balance: f64,
        broker_account_id: Option<&str>,
    ) -> Result<EmptyResponse, RestError> {
        let balance = finite_balance(balance)?;
        self.rest
            .call(
                &CURRENCIES_BALANCE,
                &AccountQuery { broker_account_id },
                Some(&CurrencyBalanceBody { currency, balance }),
            )
            .await
    }

    async fn set_position_balance(
        &self,
        figi: &str,
        balance: f64,
        broker_account_id: Option<&str>,
    ) -> Result<EmptyResponse, RestError> {
        let balance = finite_balance(balance)?;
        self.rest
            .call(
                &POSITIONS_BALANCE,
                &AccountQuery { broker_account_id },
                Some(&PositionBalanceBody { figi, balance }),
            )
            .await
    }

    async fn remove_account(
        &self,
        broker_account_id: Option<&str>,
    ) -> Result<EmptyResponse, RestError> {
        self.rest
            .call(&REMOVE, &AccountQuery { broker_account_id }, None::<&()>)
            .await
    }

    async fn clear_positions(
        &self,
        broker_account_id: Option<&str>,
    ) -> Result<EmptyResponse, RestError> {
        self.rest
            .call(&CLEAR, &AccountQuery { broker_account_id }, None::<&()>)
            .await
    }
}
