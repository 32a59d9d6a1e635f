use crate::domain::gateway::{GatewayRequest, GatewayResult};
use crate::domain::ports::Gateway;
use crate::error::GatewayError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const SECRET_HEADER: &str = "x-bot-secret";

/// Backend gateway over a single JSON-over-HTTP endpoint.
///
/// Each call POSTs `{"action": ..., ...params}` with the shared secret in the
/// `x-bot-secret` header. The HTTP status is not interpreted: backends answer
/// soft errors with a JSON body whatever the status, so only the body decides
/// the outcome. There are no retries.
pub struct HttpGateway {
    client: Client,
    endpoint: String,
    secret: String,
}

impl HttpGateway {
    pub fn new(
        endpoint: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            secret: secret.into(),
        })
    }

    async fn post(&self, request: &GatewayRequest) -> GatewayResult {
        let response = self
            .client
            .post(&self.endpoint)
            .header(SECRET_HEADER, &self.secret)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(action = request.action(), %status, "Gateway replied");

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|err| GatewayError::Malformed(format!("status {status}: {err}")))?;

        if value.is_object() {
            Ok(value)
        } else {
            Err(GatewayError::Malformed(format!(
                "status {status}: expected a JSON object"
            )))
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn call(&self, request: &GatewayRequest) -> GatewayResult {
        let action = request.action();
        tracing::debug!(action, "Calling gateway");

        let result = self.post(request).await;
        if let Err(err) = &result {
            tracing::warn!(action, %err, "Gateway call failed");
        }
        result
    }
}
