//! reqwest-backed [`ProxyTransport`] used by the terminal wizard.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use movelead_core::{ProxyReply, ProxyTransport, TransportError};
use movelead_domain::ProxyRequest;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000/proxy";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct HttpProxyTransport {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpProxyTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_decode() || err.is_body() {
            TransportError::Body(err.to_string())
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl ProxyTransport for HttpProxyTransport {
    async fn post(&self, request: &ProxyRequest) -> Result<ProxyReply, TransportError> {
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|err| self.classify(err))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|err| self.classify(err))?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        debug!(status, url = %self.url, "proxy replied");
        Ok(ProxyReply::new(status, body))
    }
}
