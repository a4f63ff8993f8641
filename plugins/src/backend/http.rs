use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Response, StatusCode};
use serde_json::Value;

use pybebra_core::api::ClientError;

pub const TOKEN_HEADER: &str = "X-Playground-Token";

pub fn build_http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("pybebra/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

pub fn request_headers(token: &str, accept: &'static str) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    let token = HeaderValue::from_str(token).map_err(|_| ClientError::Connect {
        message: "Playground token contains characters not allowed in a header".to_string(),
    })?;
    headers.insert(TOKEN_HEADER, token);
    headers.insert(ACCEPT, HeaderValue::from_static(accept));
    Ok(headers)
}

/// Request body shared by both endpoints: `{"payload":{"code":...}}`.
pub fn json_body(code: &str) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(&serde_json::json!({ "payload": { "code": code } }))
        .map_err(ClientError::Decode)
}

pub fn connect_error(e: reqwest::Error) -> ClientError {
    ClientError::Connect {
        message: format!("Could not reach the optimization service: {e}"),
    }
}

pub fn read_error(e: reqwest::Error) -> ClientError {
    ClientError::Read {
        message: e.to_string(),
    }
}

/// Passes 2xx responses through; anything else becomes `ClientError::HttpStatus`
/// with a message extracted from the body.
pub async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(
        target: "pybebra.http",
        status = status.as_u16(),
        body_len = body.len(),
        "optimization service returned an error status"
    );
    Err(ClientError::HttpStatus {
        status: status.as_u16(),
        message: server_error_message(status, &body),
    })
}

/// `detail` string of a JSON error body, else a plain-text body, else the
/// status reason.
pub fn server_error_message(status: StatusCode, body: &str) -> String {
    let reason = || status.canonical_reason().unwrap_or("Unknown error").to_string();
    let text = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(v) => v
            .get("detail")
            .and_then(|d| d.as_str())
            .map(|d| d.to_string())
            .unwrap_or_else(reason),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => reason(),
    };
    format!("Server error: {text}")
}
