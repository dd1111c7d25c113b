//! The lead record accumulated across the four form steps.

use serde::{Deserialize, Serialize};

use crate::wire::ProxyRequest;

/// Mutable form state for a single session.
///
/// Values are kept exactly as entered; validators trim before checking and
/// the request builders trim before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDraft {
    pub zip_code: String,
    pub move_to_zip_code: String,
    pub move_to_state: String,
    /// `YYYY-MM-DD`, as produced by a date input.
    pub move_date: String,
    pub moving_size: String,
    #[serde(default)]
    pub long_distance_custom: bool,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email_address: String,
    #[serde(default)]
    pub selected_affiliates: Vec<String>,
    #[serde(default)]
    pub disclaimer_accepted: bool,
}

impl LeadDraft {
    /// Body of the quote lookup: the step-1 fields only.
    pub fn quote_request(&self) -> ProxyRequest {
        ProxyRequest {
            zip_code: self.zip_code.trim().to_string(),
            move_to_zip_code: self.move_to_zip_code.trim().to_string(),
            move_to_state: self.move_to_state.trim().to_string(),
            move_date: self.move_date.trim().to_string(),
            moving_size: self.moving_size.trim().to_string(),
            long_distance_custom: self.long_distance_custom.then_some(true),
            ..ProxyRequest::default()
        }
    }

    /// Body of the final submission: every field plus the chosen affiliates.
    pub fn submission_request(&self) -> ProxyRequest {
        ProxyRequest {
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            phone_number: Some(self.phone_number.trim().to_string()),
            email_address: Some(self.email_address.trim().to_string()),
            selected_affiliates: self.selected_affiliates.clone(),
            ..self.quote_request()
        }
    }

    pub fn is_affiliate_selected(&self, id: &str) -> bool {
        self.selected_affiliates.iter().any(|selected| selected == id)
    }
}
