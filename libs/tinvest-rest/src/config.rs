use std::time::Duration;

use serde::{Deserialize, Serialize};
use tinvest_http::{DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};

use crate::secret::SecretString;

/// Sandbox endpoint root of the `TInvest` OpenAPI
pub const DEFAULT_BASE_URL: &str = "https://api-invest.tinkoff.ru/openapi/sandbox";

/// Connection settings for [`RestClient`](crate::RestClient).
///
/// ```yaml
/// base_url: "https://api-invest.tinkoff.ru/openapi/sandbox"
/// token: "t.xxxxx"
/// timeout: "15s"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RestConfig {
    /// API root; endpoint paths are appended to it verbatim.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Never serialized back out.
    #[serde(skip_serializing)]
    pub token: Option<SecretString>,

    /// Per-request timeout in humantime format ("30s", "1m 30s").
    #[serde(default = "default_timeout", with = "humantime_duration")]
    pub timeout: Duration,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Response body limit in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Accept `http://` base URLs. Only for local mock servers.
    pub allow_insecure_http: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            max_body_size: default_max_body_size(),
            allow_insecure_http: false,
        }
    }
}

impl RestConfig {
    /// Transport settings derived from this config.
    #[must_use]
    pub fn http_config(&self) -> HttpClientConfig {
        let transport = if self.allow_insecure_http {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        };
        HttpClientConfig {
            request_timeout: self.timeout,
            max_body_size: self.max_body_size,
            user_agent: self.user_agent.clone(),
            transport,
            ..HttpClientConfig::default()
        }
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
