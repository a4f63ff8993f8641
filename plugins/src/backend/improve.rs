use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use pybebra_core::api::{
    BackendConfig, ClientError, EventCallback, EventKind, OptimizationClient, OptimizationEvent,
};

use super::http::{
    build_http_client, connect_error, ensure_success, json_body, read_error, request_headers,
};

#[derive(Debug, Deserialize)]
struct ImproveResponse {
    improved: String,
}

/// Client for the single-shot `/improve` endpoint. The whole response is
/// reported as one `result` event; there is no progress to stream.
pub struct ImproveClient {
    http: reqwest::Client,
    url: String,
    token: String,
    timeout: Duration,
}

impl ImproveClient {
    pub fn new(cfg: &BackendConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_http_client()?,
            url: cfg.improve_url(),
            token: cfg.token.clone(),
            timeout: cfg.timeout(),
        })
    }

    async fn request(&self, code: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(&self.url)
            .headers(request_headers(&self.token, "application/json")?)
            .header(CONTENT_TYPE, "application/json")
            .body(json_body(code)?)
            .send()
            .await
            .map_err(connect_error)?;
        let resp = ensure_success(resp).await?;
        let bytes = resp.bytes().await.map_err(read_error)?;
        let parsed: ImproveResponse =
            serde_json::from_slice(&bytes).map_err(ClientError::Decode)?;
        Ok(parsed.improved)
    }
}

#[async_trait]
impl OptimizationClient for ImproveClient {
    fn name(&self) -> &str {
        "json"
    }

    async fn optimize(&self, code: &str, on_event: EventCallback<'_>) {
        let outcome = tokio::time::timeout(self.timeout, self.request(code)).await;
        let err = match outcome {
            Ok(Ok(improved)) => {
                on_event(OptimizationEvent::new(
                    EventKind::Result.tag(),
                    serde_json::json!({
                        "generated_code": improved,
                        "performance_improvement": "N/A",
                    }),
                ));
                return;
            }
            Ok(Err(e)) => e,
            Err(_) => ClientError::Timeout(self.timeout),
        };
        tracing::warn!(
            target: "pybebra.improve",
            url = %self.url,
            error = %err,
            timeout = err.is_timeout(),
            "optimization request failed"
        );
        on_event(OptimizationEvent::error(err.user_message()));
    }
}
