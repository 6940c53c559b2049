#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `RestSandboxClient` against a mock brokerage.

use httpmock::prelude::*;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use tinvest_rest::{ResponseStatus, RestClient, RestConfig, SecretString};
use tinvest_sandbox_sdk::{
    BrokerAccountType, RestError, RestSandboxClient, SandboxClient, SandboxCurrency,
};

const BASE: &str = "/openapi/sandbox";

fn sandbox(server: &MockServer) -> RestSandboxClient {
    let config = RestConfig {
        base_url: server.url(BASE),
        token: Some(SecretString::new("t.sandbox-token")),
        allow_insecure_http: true,
        ..RestConfig::default()
    };
    RestSandboxClient::new(RestClient::new(config).unwrap())
}

fn ack(tracking_id: &str) -> serde_json::Value {
    json!({"trackingId": tracking_id, "status": "Ok", "payload": {}})
}

#[tokio::test]
async fn register_without_type_sends_no_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/register")
            .header("authorization", "Bearer t.sandbox-token")
            .header_missing("content-type")
            .body("");
        then.status(200).json_body(json!({
            "trackingId": "reg",
            "status": "Ok",
            "payload": {"brokerAccountType": "Tinkoff", "brokerAccountId": "SB100500"}
        }));
    });

    let resp = sandbox(&server).register(None).await.unwrap();

    mock.assert();
    assert_eq!(resp.tracking_id, "reg");
    assert_eq!(resp.payload.broker_account_id, "SB100500");
    assert_eq!(resp.payload.broker_account_type, BrokerAccountType::Tinkoff);
}

#[tokio::test]
async fn register_with_type_sends_it() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/register")
            .json_body(json!({"brokerAccountType": "Tinkoff"}));
        then.status(200).json_body(json!({
            "trackingId": "reg",
            "status": "Ok",
            "payload": {"brokerAccountType": "Tinkoff", "brokerAccountId": "SB1"}
        }));
    });

    sandbox(&server)
        .register(Some(BrokerAccountType::Tinkoff))
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn currency_balance_without_account() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/currencies/balance")
            .query_param_missing("brokerAccountId")
            .header("content-type", "application/json")
            .json_body(json!({"currency": "USD", "balance": 100.5}));
        then.status(200).json_body(ack("cur"));
    });

    let resp = sandbox(&server)
        .set_currency_balance(SandboxCurrency::Usd, 100.5, None)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(resp.tracking_id, "cur");
}

#[tokio::test]
async fn currency_balance_for_account() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/currencies/balance")
            .query_param("brokerAccountId", "acc-1")
            .json_body(json!({"currency": "USD", "balance": 100.5}));
        then.status(200).json_body(ack("cur"));
    });

    sandbox(&server)
        .set_currency_balance(SandboxCurrency::Usd, 100.5, Some("acc-1"))
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn position_balance_sends_figi() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/positions/balance")
            .query_param("brokerAccountId", "acc-2")
            .json_body(json!({"figi": "BBG000B9XRY4", "balance": 25.0}));
        then.status(200).json_body(ack("pos"));
    });

    let resp = sandbox(&server)
        .set_position_balance("BBG000B9XRY4", 25.0, Some("acc-2"))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(resp.tracking_id, "pos");
}

#[tokio::test]
async fn remove_and_clear_omit_absent_account() {
    let server = MockServer::start();
    let remove = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/remove")
            .query_param_missing("brokerAccountId")
            .body("");
        then.status(200).json_body(ack("rm"));
    });
    let clear = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/clear")
            .query_param_missing("brokerAccountId")
            .body("");
        then.status(200).json_body(ack("clr"));
    });

    let client = sandbox(&server);
    assert_eq!(client.remove_account(None).await.unwrap().tracking_id, "rm");
    assert_eq!(client.clear_positions(None).await.unwrap().tracking_id, "clr");

    remove.assert();
    clear.assert();
}

#[tokio::test]
async fn clear_passes_account() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/sandbox/sandbox/clear")
            .query_param("brokerAccountId", "SB100500");
        then.status(200).json_body(ack("clr"));
    });

    sandbox(&server)
        .clear_positions(Some("SB100500"))
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn error_status_propagates_with_server_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/openapi/sandbox/sandbox/remove");
        then.status(400).json_body(json!({
            "trackingId": "bad",
            "status": "Error",
            "payload": {"message": "Broker account not found", "code": "VALIDATION_ERROR"}
        }));
    });

    let err = sandbox(&server)
        .remove_account(Some("missing"))
        .await
        .unwrap_err();

    mock.assert_hits(1);
    assert!(matches!(err, RestError::Http(_)));
    assert_eq!(err.status().unwrap().as_u16(), 400);
    let api = err.api_error().unwrap();
    assert_eq!(api.message.as_deref(), Some("Broker account not found"));
    assert_eq!(api.code.as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/openapi/sandbox/sandbox/clear");
        then.status(503).body("unavailable");
    });

    let err = sandbox(&server).clear_positions(None).await.unwrap_err();

    mock.assert_hits(1);
    assert!(err.api_error().is_none());
}

#[tokio::test]
async fn unexpected_payload_shape_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/openapi/sandbox/sandbox/register");
        then.status(200)
            .json_body(json!({"trackingId": "reg", "status": "Ok", "payload": {}}));
    });

    let err = sandbox(&server).register(None).await.unwrap_err();
    assert!(matches!(err, RestError::Http(_)));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn trait_object_dispatch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/openapi/sandbox/sandbox/clear");
        then.status(200).json_body(ack("dyn"));
    });

    let client: std::sync::Arc<dyn SandboxClient> = std::sync::Arc::new(sandbox(&server));
    let resp = client.clear_positions(None).await.unwrap();
    assert_eq!(resp.tracking_id, "dyn");
}

type CallFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(String, ResponseStatus), RestError>> + Send + 'a>>;

/// One sandbox operation, driven with an optional account id.
struct Operation {
    path: &'static str,
    success: serde_json::Value,
    call: for<'a> fn(&'a dyn SandboxClient, Option<&'a str>) -> CallFuture<'a>,
}

fn register<'a>(client: &'a dyn SandboxClient, _: Option<&'a str>) -> CallFuture<'a> {
    Box::pin(async move {
        let resp = client.register(Some(BrokerAccountType::TinkoffIis)).await?;
        Ok((resp.tracking_id, resp.status))
    })
}

fn currency_balance<'a>(client: &'a dyn SandboxClient, account: Option<&'a str>) -> CallFuture<'a> {
    Box::pin(async move {
        let resp = client
            .set_currency_balance(SandboxCurrency::Rub, 5_000.0, account)
            .await?;
        Ok((resp.tracking_id, resp.status))
    })
}

fn position_balance<'a>(client: &'a dyn SandboxClient, account: Option<&'a str>) -> CallFuture<'a> {
    Box::pin(async move {
        let resp = client
            .set_position_balance("BBG000B9XRY4", 7.0, account)
            .await?;
        Ok((resp.tracking_id, resp.status))
    })
}

fn remove<'a>(client: &'a dyn SandboxClient, account: Option<&'a str>) -> CallFuture<'a> {
    Box::pin(async move {
        let resp = client.remove_account(account).await?;
        Ok((resp.tracking_id, resp.status))
    })
}

fn clear<'a>(client: &'a dyn SandboxClient, account: Option<&'a str>) -> CallFuture<'a> {
    Box::pin(async move {
        let resp = client.clear_positions(account).await?;
        Ok((resp.tracking_id, resp.status))
    })
}

fn operations() -> Vec<Operation> {
    vec![
        Operation {
            path: "/openapi/sandbox/sandbox/register",
            success: json!({
                "trackingId": "register",
                "status": "Ok",
                "payload": {"brokerAccountType": "TinkoffIis", "brokerAccountId": "SB7"}
            }),
            call: register,
        },
        Operation {
            path: "/openapi/sandbox/sandbox/currencies/balance",
            success: ack("currencies/balance"),
            call: currency_balance,
        },
        Operation {
            path: "/openapi/sandbox/sandbox/positions/balance",
            success: ack("positions/balance"),
            call: position_balance,
        },
        Operation {
            path: "/openapi/sandbox/sandbox/remove",
            success: ack("remove"),
            call: remove,
        },
        Operation {
            path: "/openapi/sandbox/sandbox/clear",
            success: ack("clear"),
            call: clear,
        },
    ]
}

fn expected_tracking_id(path: &str) -> &str {
    path.trim_start_matches("/openapi/sandbox/sandbox/")
}

#[tokio::test]
async fn every_operation_omits_absent_account_id() {
    let server = MockServer::start();
    let client = sandbox(&server);

    for op in operations() {
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(op.path)
                .query_param_missing("brokerAccountId");
            then.status(200).json_body(op.success.clone());
        });

        let (tracking_id, status) = (op.call)(&client, None).await.unwrap();

        mock.assert();
        assert_eq!(tracking_id, expected_tracking_id(op.path), "{}", op.path);
        assert_eq!(status, ResponseStatus::Ok);
    }
}

#[tokio::test]
async fn every_account_operation_sends_account_id_and_decodes() {
    let server = MockServer::start();
    let client = sandbox(&server);

    for op in operations().into_iter().skip(1) {
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(op.path)
                .query_param("brokerAccountId", "SB100500");
            then.status(200).json_body(op.success.clone());
        });

        let (tracking_id, status) = (op.call)(&client, Some("SB100500")).await.unwrap();

        mock.assert();
        assert_eq!(tracking_id, expected_tracking_id(op.path), "{}", op.path);
        assert_eq!(status, ResponseStatus::Ok);
    }
}

#[tokio::test]
async fn every_operation_fails_on_non_success_status() {
    let server = MockServer::start();
    let client = sandbox(&server);

    for op in operations() {
        let mock = server.mock(|when, then| {
            when.method(POST).path(op.path);
            then.status(400).json_body(json!({
                "trackingId": "bad",
                "status": "Error",
                "payload": {"message": "Invalid request", "code": "VALIDATION_ERROR"}
            }));
        });

        let err = (op.call)(&client, Some("SB100500")).await.unwrap_err();

        mock.assert_hits(1);
        assert_eq!(err.status().unwrap().as_u16(), 400, "{}", op.path);
        let api = err.api_error().unwrap();
        assert_eq!(api.message.as_deref(), Some("Invalid request"));
    }
}

#[tokio::test]
async fn non_finite_balance_is_rejected_before_sending() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(ack("sent"));
    });
    let client = sandbox(&server);

    for balance in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = client
            .set_currency_balance(SandboxCurrency::Usd, balance, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidArgument { name: "balance", .. }));

        let err = client
            .set_position_balance("BBG000B9XRY4", balance, Some("acc-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidArgument { name: "balance", .. }));
    }

    mock.assert_hits(0);
}
