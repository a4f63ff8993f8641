use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;

use pybebra_core::api::{
    BackendConfig, ClientError, EventCallback, FrameDecoder, OptimizationClient,
    OptimizationEvent, RequestMode,
};

use super::http::{
    build_http_client, connect_error, ensure_success, json_body, read_error, request_headers,
};

/// Client for the `data:`-framed event stream endpoint.
pub struct StreamingClient {
    http: reqwest::Client,
    url: String,
    token: String,
    request: RequestMode,
    timeout: Duration,
}

impl StreamingClient {
    pub fn new(cfg: &BackendConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_http_client()?,
            url: cfg.stream_url(),
            token: cfg.token.clone(),
            request: cfg.request,
            timeout: cfg.timeout(),
        })
    }

    async fn pump<F>(&self, code: &str, on_event: &mut F) -> Result<(), ClientError>
    where
        F: FnMut(OptimizationEvent) + Send + ?Sized,
    {
        let headers = request_headers(&self.token, "text/event-stream")?;
        let req = match self.request {
            RequestMode::Post => self
                .http
                .post(&self.url)
                .header(CONTENT_TYPE, "application/json")
                .body(json_body(code)?),
            RequestMode::Get => self.http.get(&self.url).query(&[("code", code)]),
        };

        let resp = req.headers(headers).send().await.map_err(connect_error)?;
        let resp = ensure_success(resp).await?;
        tracing::debug!(
            target: "pybebra.stream",
            url = %self.url,
            status = resp.status().as_u16(),
            "event stream opened"
        );

        let mut decoder = FrameDecoder::new();
        let mut delivered = 0usize;
        let mut body = resp.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(read_error)?;
            for ev in decoder.push(&chunk) {
                delivered += 1;
                on_event(ev);
            }
        }
        let unterminated = decoder.pending_bytes();
        for ev in decoder.finish() {
            delivered += 1;
            on_event(ev);
        }

        tracing::debug!(
            target: "pybebra.stream",
            delivered,
            skipped = decoder.skipped(),
            unterminated,
            "event stream closed"
        );
        Ok(())
    }
}

#[async_trait]
impl OptimizationClient for StreamingClient {
    fn name(&self) -> &str {
        "stream"
    }

    async fn optimize(&self, code: &str, on_event: EventCallback<'_>) {
        let outcome = tokio::time::timeout(self.timeout, self.pump(code, &mut *on_event)).await;
        let err = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(_) => ClientError::Timeout(self.timeout),
        };
        tracing::warn!(
            target: "pybebra.stream",
            url = %self.url,
            error = %err,
            timeout = err.is_timeout(),
            "optimization request failed"
        );
        on_event(OptimizationEvent::error(err.user_message()));
    }
}
