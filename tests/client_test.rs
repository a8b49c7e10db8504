//! Integration tests for the IO App API client — authentication header,
//! status mapping, and payload shapes against a mock server.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use io_registered_bot::error::BotError;
use io_registered_bot::io::models::MessageContent;
use io_registered_bot::io::IoServiceClient;

const FISCAL_CODE: &str = "RSSMRA80A01H501U";

fn client(server: &MockServer) -> IoServiceClient {
    IoServiceClient::new(&server.uri(), "test-token-123").unwrap()
}

#[tokio::test]
async fn test_get_profile_sends_subscription_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/profiles/{FISCAL_CODE}")))
        .and(header("Ocp-Apim-Subscription-Key", "test-token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sender_allowed": true })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server).get_profile(FISCAL_CODE).await.unwrap();
    assert!(profile.sender_allowed);
}

#[tokio::test]
async fn test_get_profile_sender_not_allowed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/profiles/{FISCAL_CODE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sender_allowed": false })))
        .mount(&server)
        .await;

    let profile = client(&server).get_profile(FISCAL_CODE).await.unwrap();
    assert!(!profile.sender_allowed);
}

#[tokio::test]
async fn test_get_profile_not_found_names_the_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/profiles/{FISCAL_CODE}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .mount(&server)
        .await;

    let error = client(&server).get_profile(FISCAL_CODE).await.unwrap_err();
    match error {
        BotError::NotFound(context) => assert!(context.contains(FISCAL_CODE)),
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_profile_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/profiles/{FISCAL_CODE}")))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let error = client(&server).get_profile(FISCAL_CODE).await.unwrap_err();
    assert!(matches!(error, BotError::RateLimited));
}

#[tokio::test]
async fn test_get_profile_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/profiles/{FISCAL_CODE}")))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad subscription key"))
        .mount(&server)
        .await;

    let error = client(&server).get_profile(FISCAL_CODE).await.unwrap_err();
    assert!(matches!(error, BotError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_get_profile_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/profiles/{FISCAL_CODE}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let error = client(&server).get_profile(FISCAL_CODE).await.unwrap_err();
    match error {
        BotError::UnexpectedStatus { status, .. } => assert_eq!(status, 500),
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_profile_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/profiles/{FISCAL_CODE}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let error = client(&server).get_profile(FISCAL_CODE).await.unwrap_err();
    assert!(matches!(error, BotError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_get_subscriptions_on_day() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions-feed/2022-01-15"))
        .and(header("Ocp-Apim-Subscription-Key", "test-token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date_utc": "2022-01-15",
            "subscriptions": ["aa11", "bb22"],
            "unsubscriptions": ["cc33"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2022, 1, 15).unwrap();
    let feed = client(&server).get_subscriptions_on_day(day).await.unwrap();

    assert_eq!(feed.date_utc, day);
    assert_eq!(feed.subscriptions, vec!["aa11", "bb22"]);
    assert_eq!(feed.unsubscriptions, vec!["cc33"]);
}

#[tokio::test]
async fn test_get_subscriptions_on_day_missing_lists_default_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions-feed/2022-01-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "date_utc": "2022-01-15" })))
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2022, 1, 15).unwrap();
    let feed = client(&server).get_subscriptions_on_day(day).await.unwrap();

    assert!(feed.subscriptions.is_empty());
    assert!(feed.unsubscriptions.is_empty());
}

#[tokio::test]
async fn test_get_subscriptions_on_day_unauthorized() {
    // The feed endpoint requires special authorization on the service.
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions-feed/2022-01-15"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2022, 1, 15).unwrap();
    let error = client(&server)
        .get_subscriptions_on_day(day)
        .await
        .unwrap_err();
    match error {
        BotError::Unauthorized { context } => assert!(context.contains("2022-01-15")),
        other => panic!("expected Unauthorized, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_send_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/messages/{FISCAL_CODE}")))
        .and(body_partial_json(json!({
            "time_to_live": 3600,
            "content": {
                "subject": "Reminder",
                "markdown": "Your document is ready."
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "msg-0001" })))
        .expect(1)
        .mount(&server)
        .await;

    let content = MessageContent {
        subject: "Reminder".to_string(),
        markdown: "Your document is ready.".to_string(),
        payment_data: None,
        prescription_data: None,
        legal_data: None,
        eu_covid_cert: None,
        due_date: None,
    };

    let response = client(&server)
        .send_message(FISCAL_CODE, &content, 3600, None)
        .await
        .unwrap();
    assert_eq!(response.id, "msg-0001");
}

#[tokio::test]
async fn test_get_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/messages/{FISCAL_CODE}/msg-0001")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "subject": "Reminder",
                "markdown": "Your document is ready."
            },
            "notification": { "email": "user@example.com" }
        })))
        .mount(&server)
        .await;

    let response = client(&server)
        .get_message(FISCAL_CODE, "msg-0001")
        .await
        .unwrap();
    assert_eq!(response.message.subject, "Reminder");
    assert_eq!(response.notification.unwrap().email, "user@example.com");
}
