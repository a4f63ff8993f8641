use std::io::Write;

use anyhow::Result;

use pybebra_core::api::{BackendConfig, OptimizationClient, RunRenderer, Transport};

use crate::backend::{ImproveClient, StreamingClient};
use crate::stream::{JsonlRenderer, TextOptions, TextRenderer};

pub fn build_client(cfg: &BackendConfig) -> Result<Box<dyn OptimizationClient>> {
    let client: Box<dyn OptimizationClient> = match cfg.transport {
        Transport::Stream => Box::new(StreamingClient::new(cfg)?),
        Transport::Json => Box::new(ImproveClient::new(cfg)?),
    };
    tracing::debug!(target: "pybebra.factory", client = client.name(), "client built");
    Ok(client)
}

/// `"jsonl"` selects JSON lines; anything else falls back to text.
pub fn build_renderer<W>(stream_format: &str, out: W, opts: TextOptions) -> Box<dyn RunRenderer>
where
    W: Write + Send + 'static,
{
    match stream_format {
        "jsonl" => Box::new(JsonlRenderer::new(out)),
        _ => Box::new(TextRenderer::new(out, opts)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pybebra_core::api::AppConfig;

    #[test]
    fn client_follows_transport() {
        let mut cfg = AppConfig::default().backend;
        assert_eq!(build_client(&cfg).unwrap().name(), "stream");
        cfg.transport = Transport::Json;
        assert_eq!(build_client(&cfg).unwrap().name(), "json");
    }
}
