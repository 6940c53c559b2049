use anyhow::Result;
use clap::Subcommand;
use serde_json::Value;
use tinvest_rest::RestError;
use tinvest_sandbox_sdk::{BrokerAccountType, SandboxClient, SandboxCurrency};

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Open a new sandbox account
    Register {
        /// Account type: tinkoff or tinkoff-iis
        #[arg(long = "type", value_name = "TYPE")]
        account_type: Option<BrokerAccountType>,
    },
    /// Set the balance of a currency
    CurrencyBalance {
        /// RUB, USD, EUR, GBP, HKD, CHF, JPY, CNY or TRY
        currency: SandboxCurrency,
        #[arg(value_parser = parse_balance)]
        balance: f64,
        /// Broker account id; the default account when omitted
        #[arg(long)]
        account: Option<String>,
    },
    /// Set the position of an instrument
    PositionBalance {
        /// Instrument FIGI, e.g. BBG000B9XRY4
        figi: String,
        #[arg(value_parser = parse_balance)]
        balance: f64,
        #[arg(long)]
        account: Option<String>,
    },
    /// Delete a sandbox account
    Remove {
        #[arg(long)]
        account: Option<String>,
    },
    /// Remove all positions and balances of an account
    Clear {
        #[arg(long)]
        account: Option<String>,
    },
}

impl Command {
    /// Run the command and return the decoded response as JSON.
    ///
    /// # Errors
    /// Returns the failed call, annotated with the server's message when the
    /// response carried one.
    pub async fn run(&self, client: &dyn SandboxClient) -> Result<Value> {
        let value = match self {
            Self::Register { account_type } => {
                serde_json::to_value(client.register(*account_type).await.map_err(describe)?)?
            }
            Self::CurrencyBalance {
                currency,
                balance,
                account,
            } => serde_json::to_value(
                client
                    .set_currency_balance(*currency, *balance, account.as_deref())
                    .await
                    .map_err(describe)?,
            )?,
            Self::PositionBalance {
                figi,
                balance,
                account,
            } => serde_json::to_value(
                client
                    .set_position_balance(figi, *balance, account.as_deref())
                    .await
                    .map_err(describe)?,
            )?,
            Self::Remove { account } => serde_json::to_value(
                client
                    .remove_account(account.as_deref())
                    .await
                    .map_err(describe)?,
            )?,
            Self::Clear { account } => serde_json::to_value(
                client
                    .clear_positions(account.as_deref())
                    .await
                    .map_err(describe)?,
            )?,
        };
        Ok(value)
    }
}

fn parse_balance(raw: &str) -> Result<f64, String> {
    let balance: f64 = raw.parse().map_err(|e| format!("invalid balance {raw:?}: {e}"))?;
    if balance.is_finite() {
        Ok(balance)
    } else {
        Err(format!("balance must be a finite number, got {raw}"))
    }
}

fn describe(err: RestError) -> anyhow::Error {
    let server_message = err
        .api_error()
        .and_then(|payload| match (payload.code, payload.message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        });
    let err = anyhow::Error::new(err);
    match server_message {
        Some(message) => err.context(format!("sandbox request rejected ({message})")),
        None => err.context("sandbox request failed"),
    }
}
