//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::ClientConfig;
use crate::transport::{Transport, TransportFailure, TransportRequest, TransportResponse};
use crate::utils::http::create_async_client;

/// Transport that talks to the real portal over HTTPS.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    no_cache: bool,
}

impl HttpTransport {
    /// Build a transport from client settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(create_async_client(config)?, config.no_cache))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client, no_cache: bool) -> Self {
        Self { client, no_cache }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportFailure> {
        let mut builder = self.client.post(request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if self.no_cache {
            builder = builder
                .header("Cache-Control", "no-cache")
                .header("Pragma", "no-cache");
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| TransportFailure(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure(format!("failed to read response body: {e}")))?;

        log::debug!("Portal answered {} with {} bytes", status, body.len());
        Ok(TransportResponse { status, body })
    }
}
