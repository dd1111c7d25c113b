//! JSON shapes exchanged with the proxy relay and the upstream API.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::affiliate::AffiliateOffer;

/// Value of the `result` field that marks a successful upstream response.
pub const SUCCESS_MARKER: &str = "success";

/// Body of `POST /proxy`, used for both the quote lookup and the submission.
///
/// Missing step-1 fields deserialize as empty strings so the relay can report
/// them as field errors instead of rejecting the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub move_to_zip_code: String,
    #[serde(default)]
    pub move_to_state: String,
    #[serde(default)]
    pub move_date: String,
    #[serde(default)]
    pub moving_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_distance_custom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_affiliates: Vec<String>,
}

/// Successful (HTTP 2xx) relay body, shaped by the upstream API.
///
/// Only `result` decides success; unknown fields are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<AffiliateOffer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        self.result.as_deref() == Some(SUCCESS_MARKER)
    }
}

/// One rejected field in a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Body of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorsBody {
    pub errors: Vec<FieldError>,
}

/// Body of 429, 502 and 500 responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Internal failure trace; only populated outside production.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }
}

/// Lead document posted to the upstream lead-distribution API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyPayload {
    pub auth: CampaignAuth,
    pub mode: PayloadMode,
    pub lead: UpstreamLead,
}

impl ProxyPayload {
    pub fn new(auth: CampaignAuth, test: bool, request: &ProxyRequest) -> Self {
        Self {
            auth,
            mode: PayloadMode { test },
            lead: UpstreamLead::from(request),
        }
    }
}

/// Campaign credentials. The key never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignAuth {
    #[serde(rename = "lp_campaign_id")]
    pub campaign_id: String,
    #[serde(rename = "lp_campaign_key")]
    pub campaign_key: String,
}

impl fmt::Debug for CampaignAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CampaignAuth")
            .field("campaign_id", &self.campaign_id)
            .field("campaign_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMode {
    #[serde(rename = "lp_test")]
    pub test: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamLead {
    pub zip_code: String,
    pub move_date: String,
    pub move_to_state: String,
    pub move_to_zip_code: String,
    pub moving_size: String,
    pub long_distance_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_affiliates: Vec<String>,
}

impl From<&ProxyRequest> for UpstreamLead {
    fn from(request: &ProxyRequest) -> Self {
        Self {
            zip_code: request.zip_code.trim().to_string(),
            move_date: request.move_date.trim().to_string(),
            move_to_state: request.move_to_state.trim().to_string(),
            move_to_zip_code: request.move_to_zip_code.trim().to_string(),
            moving_size: request.moving_size.trim().to_string(),
            long_distance_custom: request.long_distance_custom.unwrap_or(false),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            phone_number: request.phone_number.clone(),
            email_address: request.email_address.clone(),
            selected_affiliates: request.selected_affiliates.clone(),
        }
    }
}
