//! Affiliate (brand) offers returned by the lead-distribution API.

use serde::{Deserialize, Serialize};

/// A mover offered as a match for a lead.
///
/// Field names on the wire follow the upstream brand schema
/// (`lp_brand_id`, `logo_url`, `tcpa`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateOffer {
    #[serde(rename = "lp_brand_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "logo_url", default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Consent-to-contact (TCPA) notice shown next to the offer.
    #[serde(rename = "tcpa", default)]
    pub disclosure: String,
}

impl AffiliateOffer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        disclosure: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logo: None,
            disclosure: disclosure.into(),
        }
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}
