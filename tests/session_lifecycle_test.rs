use httpmock::prelude::*;
use serde_json::json;
use sw_client::{ApiResponse, Executor, Session};

#[tokio::test]
async fn test_first_business_call_authenticates_exactly_once() {
    let server = MockServer::start();

    let auth = server.mock(|when, then| {
        when.method(POST)
            .path("/security/authenticate")
            .json_body(json!({"user": "user@test", "password": "secret"}));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"status": "success", "data": {"token": "t-fresh"}}));
    });
    let business = server.mock(|when, then| {
        when.method(GET)
            .path("/account/balance")
            .header("Authorization", "Bearer t-fresh");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"status": "success"}));
    });

    let session = Session::with_credentials(server.base_url(), "user@test", "secret");
    session.ensure_valid().await;

    let request = session.request().await.unwrap();
    let response: ApiResponse<serde_json::Value> = Executor::new(session.base_url())
        .get("account/balance", &request)
        .await;

    assert!(response.is_success());
    auth.assert_hits(1);
    business.assert_hits(1);
}

#[tokio::test]
async fn test_token_session_calls_business_endpoint_directly() {
    let server = MockServer::start();

    let auth = server.mock(|when, then| {
        when.method(POST).path("/security/authenticate");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"status": "success", "data": {"token": "unused"}}));
    });
    let business = server.mock(|when, then| {
        when.method(GET)
            .path("/account/balance")
            .header("Authorization", "Bearer pre-issued");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"status": "success"}));
    });

    let session = Session::with_token(server.base_url(), "pre-issued");
    session.ensure_valid().await;

    let request = session.request().await.unwrap();
    let response: ApiResponse<serde_json::Value> = Executor::new(session.base_url())
        .get("account/balance", &request)
        .await;

    assert!(response.is_success());
    auth.assert_hits(0);
    business.assert_hits(1);
}

#[tokio::test]
async fn test_failed_auth_leads_to_unauthorized_business_call() {
    let server = MockServer::start();

    let auth = server.mock(|when, then| {
        when.method(POST).path("/security/authenticate");
        then.status(401)
            .header("Content-Type", "application/json")
            .json_body(
                json!({"status": "error", "message": "AU2000", "messageDetail": "bad login"}),
            );
    });
    // Without a token the business call goes out with no Authorization
    // header and the API reports its own error inside a 401 body.
    let business = server.mock(|when, then| {
        when.method(GET).path("/account/balance");
        then.status(401)
            .header("Content-Type", "application/json")
            .json_body(
                json!({"status": "error", "message": "AU1000", "messageDetail": "no token"}),
            );
    });

    let session = Session::with_credentials(server.base_url(), "user@test", "wrong");
    session.ensure_valid().await;
    assert!(!session.is_valid().await);

    let request = session.request().await.unwrap();
    let response: ApiResponse<serde_json::Value> = Executor::new(session.base_url())
        .get("account/balance", &request)
        .await;

    assert_eq!(response.status, "error");
    assert_eq!(response.message.as_deref(), Some("AU1000"));
    auth.assert_hits(1);
    business.assert_hits(1);
}
