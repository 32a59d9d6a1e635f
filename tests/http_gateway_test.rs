use gatebot::domain::chat::ChatId;
use gatebot::domain::gateway::GatewayRequest;
use gatebot::domain::ports::Gateway;
use gatebot::error::GatewayError;
use gatebot::infrastructure::http_gateway::HttpGateway;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn check_connection() -> GatewayRequest {
    GatewayRequest::CheckConnection {
        telegram_chat_id: ChatId::new("1001"),
    }
}

fn gateway(server: &MockServer, timeout: Duration) -> HttpGateway {
    HttpGateway::new(format!("{}/bot", server.uri()), "s3cret", timeout).unwrap()
}

#[tokio::test]
async fn test_posts_action_with_secret_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot"))
        .and(header("x-bot-secret", "s3cret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "action": "check_connection",
            "telegram_chat_id": "1001",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": true,
            "username": "mira",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway(&server, Duration::from_secs(5))
        .call(&check_connection())
        .await;

    assert_eq!(result, Ok(json!({"connected": true, "username": "mira"})));
}

#[tokio::test]
async fn test_error_status_with_json_body_is_returned_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"success": false, "message": "Invalid code"})),
        )
        .mount(&server)
        .await;

    let result = gateway(&server, Duration::from_secs(5))
        .call(&GatewayRequest::Connect {
            code: "nope".to_string(),
            telegram_chat_id: ChatId::new("1001"),
        })
        .await;

    assert_eq!(
        result,
        Ok(json!({"success": false, "message": "Invalid code"}))
    );
}

#[tokio::test]
async fn test_slow_backend_is_reported_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"connected": true}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = gateway(&server, Duration::from_millis(200))
        .call(&check_connection())
        .await;

    assert_eq!(result, Err(GatewayError::Timeout));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let result = gateway(&server, Duration::from_secs(5))
        .call(&check_connection())
        .await;

    assert!(matches!(result, Err(GatewayError::Malformed(_))));
}

#[tokio::test]
async fn test_json_array_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let result = gateway(&server, Duration::from_secs(5))
        .call(&check_connection())
        .await;

    assert!(matches!(result, Err(GatewayError::Malformed(_))));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Nothing listens on the discard port.
    let gateway = HttpGateway::new("http://127.0.0.1:9/bot", "s3cret", Duration::from_secs(5))
        .unwrap();

    let result = gateway.call(&check_connection()).await;

    assert!(matches!(
        result,
        Err(GatewayError::Transport(_) | GatewayError::Timeout)
    ));
}
