use serde::Serialize;
use serde::de::DeserializeOwned;
use tinvest_http::{HttpClient, HttpClientBuilder};
use url::Url;

use crate::config::RestConfig;
use crate::endpoint::Endpoint;
use crate::error::RestError;

/// Generic client for the `TInvest` REST API.
///
/// Turns an [`Endpoint`] plus query and body values into exactly one HTTP
/// request and decodes the JSON reply. Cloning is cheap; clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct RestClient {
    http: HttpClient,
    base_url: String,
}

impl RestClient {
    /// Build the transport described by `config`.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns `RestError::InvalidUrl` for an unparsable base URL, or
    /// `RestError::Http` if the transport cannot be built.
    pub fn new(config: RestConfig) -> Result<Self, RestError> {
        let mut builder = HttpClientBuilder::with_config(config.http_config());
        if let Some(token) = &config.token {
            builder = builder.bearer_token(token.expose());
        }
        Self::with_http(builder.build()?, &config.base_url)
    }

    /// Wrap an already built transport.
    ///
    /// # Errors
    /// Returns `RestError::InvalidUrl` if `base_url` is not an absolute URL.
    pub fn with_http(http: HttpClient, base_url: &str) -> Result<Self, RestError> {
        Url::parse(base_url).map_err(|source| RestError::InvalidUrl {
            url: base_url.to_owned(),
            source,
        })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call `endpoint` and decode the response into its declared shape.
    ///
    /// `query` is form-encoded into the URL; fields skipped during
    /// serialization do not appear at all. `body`, when present, is sent as
    /// JSON.
    ///
    /// # Errors
    /// Returns `RestError::Http` on transport failure, non-2xx status or a
    /// body that does not decode into `R`; `RestError::InvalidUrl` or
    /// `RestError::QueryEncode` if the request cannot be assembled.
    pub async fn call<R, Q, B>(
        &self,
        endpoint: &Endpoint<R>,
        query: &Q,
        body: Option<&B>,
    ) -> Result<R, RestError>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.send(endpoint.method().clone(), endpoint.path(), query, body)
            .await
    }

    /// POST to an ad-hoc `path`.
    ///
    /// # Errors
    /// Same as [`call`](Self::call).
    pub async fn post<R, Q, B>(&self, path: &str, query: &Q, body: Option<&B>) -> Result<R, RestError>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.send(http::Method::POST, path, query, body).await
    }

    async fn send<R, Q, B>(
        &self,
        method: http::Method,
        path: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<R, RestError>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = self.url(path, query)?;
        tracing::debug!(%method, path, "calling endpoint");

        let result = self.execute(method.clone(), &url, body).await;
        if let Err(err) = &result {
            tracing::warn!(
                %method,
                path,
                status = err.status().as_ref().map(http::StatusCode::as_u16),
                error = %err,
                "endpoint call failed"
            );
        }
        result
    }

    fn url<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Url, RestError> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = Url::parse(&raw).map_err(|source| RestError::InvalidUrl { url: raw, source })?;

        let encoded = serde_urlencoded::to_string(query)?;
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    async fn execute<R, B>(
        &self,
        method: http::Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<R, RestError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, url.as_str());
        if let Some(body) = body {
            request = request.json(body)?;
        }
        Ok(request.send().await?.json().await?)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::schema::{EmptyResponse, ResponseStatus};
    use crate::secret::SecretString;
    use httpmock::prelude::*;
    use serde_json::json;
    use tinvest_http::HttpError;

    const CLEAR: Endpoint<EmptyResponse> = Endpoint::post("/sandbox/clear");

    #[derive(Serialize)]
    struct AccountQuery<'a> {
        #[serde(rename = "brokerAccountId", skip_serializing_if = "Option::is_none")]
        broker_account_id: Option<&'a str>,
    }

    fn ok_body() -> serde_json::Value {
        json!({"trackingId": "trk", "status": "Ok", "payload": {}})
    }

    fn client_for(server: &MockServer) -> RestClient {
        RestClient::new(RestConfig {
            base_url: server.base_url(),
            allow_insecure_http: true,
            ..RestConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn call_appends_path_to_base() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/openapi/sandbox/sandbox/clear");
            then.status(200).json_body(ok_body());
        });

        let client = RestClient::new(RestConfig {
            base_url: server.url("/openapi/sandbox/"),
            allow_insecure_http: true,
            ..RestConfig::default()
        })
        .unwrap();
        let resp = client
            .call(&CLEAR, &AccountQuery { broker_account_id: None }, None::<&()>)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(resp.tracking_id, "trk");
        assert_eq!(resp.status, ResponseStatus::Ok);
    }

    #[tokio::test]
    async fn absent_query_field_leaves_no_query_string() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/sandbox/clear")
                .query_param_missing("brokerAccountId");
            then.status(200).json_body(ok_body());
        });

        client_for(&server)
            .call(&CLEAR, &AccountQuery { broker_account_id: None }, None::<&()>)
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn present_query_field_is_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/sandbox/clear")
                .query_param("brokerAccountId", "2000123456");
            then.status(200).json_body(ok_body());
        });

        client_for(&server)
            .call(
                &CLEAR,
                &AccountQuery {
                    broker_account_id: Some("2000123456"),
                },
                None::<&()>,
            )
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/sandbox/positions/balance")
                .header("content-type", "application/json")
                .json_body(json!({"figi": "BBG000B9XRY4", "balance": 10.0}));
            then.status(200).json_body(ok_body());
        });

        let resp: EmptyResponse = client_for(&server)
            .post(
                "/sandbox/positions/balance",
                &(),
                Some(&json!({"figi": "BBG000B9XRY4", "balance": 10.0})),
            )
            .await
            .unwrap();
        mock.assert();
        assert_eq!(resp.tracking_id, "trk");
    }

    #[tokio::test]
    async fn token_becomes_bearer_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/sandbox/clear")
                .header("authorization", "Bearer t.sandbox");
            then.status(200).json_body(ok_body());
        });

        let client = RestClient::new(RestConfig {
            base_url: server.base_url(),
            token: Some(SecretString::new("t.sandbox")),
            allow_insecure_http: true,
            ..RestConfig::default()
        })
        .unwrap();
        client.call(&CLEAR, &(), None::<&()>).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn non_success_status_is_error_with_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/sandbox/clear");
            then.status(500).json_body(json!({
                "trackingId": "err",
                "status": "Error",
                "payload": {"message": "Broker account not found", "code": "NOT_FOUND"}
            }));
        });

        let err = client_for(&server)
            .call(&CLEAR, &(), None::<&()>)
            .await
            .unwrap_err();
        mock.assert_hits(1);
        assert_eq!(err.status(), Some(http::StatusCode::INTERNAL_SERVER_ERROR));
        let payload = err.api_error().unwrap();
        assert_eq!(payload.message.as_deref(), Some("Broker account not found"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn ad_hoc_post_failure_logs_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/sandbox/remove");
            then.status(404).body("missing");
        });

        let err = client_for(&server)
            .post::<EmptyResponse, _, _>("/sandbox/remove", &(), None::<&()>)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(http::StatusCode::NOT_FOUND));
        assert!(logs_contain("endpoint call failed"));
        assert!(logs_contain("/sandbox/remove"));
        assert!(logs_contain("status=404"));
    }

    #[tokio::test]
    async fn shape_mismatch_is_json_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/sandbox/clear");
            then.status(200).json_body(json!({"unexpected": true}));
        });

        let err = client_for(&server)
            .call(&CLEAR, &(), None::<&()>)
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::Http(HttpError::Json(_))));
    }

    #[tokio::test]
    async fn rejects_relative_base_url() {
        let http = tinvest_http::HttpClient::new().unwrap();
        let err = RestClient::with_http(http, "/openapi/sandbox").unwrap_err();
        assert!(matches!(err, RestError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn base_url_trailing_slash_is_trimmed() {
        let http = tinvest_http::HttpClient::new().unwrap();
        let client = RestClient::with_http(http, "https://api-invest.tinkoff.ru/openapi/sandbox/").unwrap();
        assert_eq!(client.base_url(), "https://api-invest.tinkoff.ru/openapi/sandbox");
        let url = client.url("/sandbox/remove", &()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-invest.tinkoff.ru/openapi/sandbox/sandbox/remove"
        );
        assert!(url.query().is_none());
    }
}
