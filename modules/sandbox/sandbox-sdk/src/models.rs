use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tinvest_rest::ApiResponse;

use crate::errors::ParseModelError;

/// Kind of brokerage account opened in the sandbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrokerAccountType {
    /// Regular brokerage account
    Tinkoff,
    /// Individual investment account
    TinkoffIis,
}

impl BrokerAccountType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tinkoff => "Tinkoff",
            Self::TinkoffIis => "TinkoffIis",
        }
    }
}

impl fmt::Display for BrokerAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the wire name as well as `tinkoff-iis`/`iis`, ignoring case.
impl FromStr for BrokerAccountType {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tinkoff" => Ok(Self::Tinkoff),
            "tinkoffiis" | "tinkoff-iis" | "tinkoff_iis" | "iis" => Ok(Self::TinkoffIis),
            _ => Err(ParseModelError {
                kind: "broker account type",
                value: s.to_owned(),
                expected: "tinkoff, tinkoff-iis",
            }),
        }
    }
}

/// Currencies whose balance the sandbox lets you set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SandboxCurrency {
    Rub,
    Usd,
    Eur,
    Gbp,
    Hkd,
    Chf,
    Jpy,
    Cny,
    Try,
}

impl SandboxCurrency {
    pub const ALL: [Self; 9] = [
        Self::Rub,
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Hkd,
        Self::Chf,
        Self::Jpy,
        Self::Cny,
        Self::Try,
    ];

    /// ISO 4217 code as sent on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rub => "RUB",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Hkd => "HKD",
            Self::Chf => "CHF",
            Self::Jpy => "JPY",
            Self::Cny => "CNY",
            Self::Try => "TRY",
        }
    }
}

impl fmt::Display for SandboxCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SandboxCurrency {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseModelError {
                kind: "currency",
                value: s.to_owned(),
                expected: "RUB, USD, EUR, GBP, HKD, CHF, JPY, CNY, TRY",
            })
    }
}

/// Account created by `register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxAccount {
    pub broker_account_type: BrokerAccountType,
    pub broker_account_id: String,
}

pub type SandboxRegisterResponse = ApiResponse<SandboxAccount>;
