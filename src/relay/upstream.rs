//! The lead-distribution API behind the relay, real or simulated.

use serde_json::{json, Value};
use tracing::{debug, info};

use movelead_config::RelayConfig;
use movelead_domain::{AffiliateOffer, ProxyPayload, SUCCESS_MARKER};

use super::RelayError;

#[derive(Debug, Clone)]
pub enum UpstreamClient {
    /// Answers every lead with a canned success carrying two brands.
    Simulated,
    Live { http: reqwest::Client, url: String },
}

impl UpstreamClient {
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        if config.use_mock_api {
            return Ok(UpstreamClient::Simulated);
        }
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(UpstreamClient::Live {
            http,
            url: config.api_url.clone(),
        })
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, UpstreamClient::Simulated)
    }

    /// Posts the payload and returns the upstream's JSON body untouched.
    pub async fn send(&self, payload: &ProxyPayload) -> Result<Value, RelayError> {
        match self {
            UpstreamClient::Simulated => {
                info!("answering with the simulated upstream response");
                Ok(simulated_response())
            }
            UpstreamClient::Live { http, url } => {
                let response = http
                    .post(url)
                    .json(payload)
                    .send()
                    .await
                    .map_err(RelayError::Unreachable)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(RelayError::UpstreamStatus {
                        status: status.as_u16(),
                        details: status.canonical_reason().unwrap_or("Unknown").to_string(),
                    });
                }
                let body: Value = response.json().await.map_err(RelayError::UpstreamBody)?;
                debug!(body = %body, "upstream response");
                Ok(body)
            }
        }
    }
}

pub fn simulated_brands() -> Vec<AffiliateOffer> {
    (1..=2)
        .map(|n| {
            AffiliateOffer::new(
                format!("brand{n}"),
                format!("Moving Company {n}"),
                format!("TCPA disclaimer for Company {n}"),
            )
            .with_logo(format!("https://example.com/logo{n}.png"))
        })
        .collect()
}

pub fn simulated_response() -> Value {
    json!({
        "result": SUCCESS_MARKER,
        "brands": simulated_brands(),
    })
}

/// Drops `brands` from an upstream body when affiliate disclosure is off.
pub fn strip_brands(body: &mut Value) {
    if let Some(object) = body.as_object_mut() {
        object.remove("brands");
    }
}
