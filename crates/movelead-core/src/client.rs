//! Lead client: the two calls the wizard makes against `POST /proxy`.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use movelead_domain::{
    AffiliateOffer, ErrorBody, FieldErrorsBody, LeadDraft, ProxyRequest, ProxyResponse,
};

use crate::error::{LeadError, TransportError};

/// Status and JSON body of a relay response. Non-JSON bodies arrive as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReply {
    pub status: u16,
    pub body: Value,
}

impl ProxyReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON document to the proxy endpoint.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn post(&self, request: &ProxyRequest) -> Result<ProxyReply, TransportError>;
}

/// Successful quote lookup. The affiliate list may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteOutcome {
    pub affiliates: Vec<AffiliateOffer>,
}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    pub body: Value,
}

pub const DISCLAIMER_REQUIRED: &str =
    "You must accept the terms of service and consent to be contacted to continue.";
pub const AFFILIATE_REQUIRED: &str = "Please select at least one affiliate to proceed.";

/// Local gate run before any submission is sent.
///
/// Affiliate selection is only required when at least one affiliate was offered.
pub fn check_submission(draft: &LeadDraft, offered: &[AffiliateOffer]) -> Result<(), LeadError> {
    let mut errors = Vec::new();
    let has_selection = offered
        .iter()
        .any(|offer| draft.is_affiliate_selected(&offer.id));
    if !offered.is_empty() && !has_selection {
        errors.push(AFFILIATE_REQUIRED.to_string());
    }
    if !draft.disclaimer_accepted {
        errors.push(DISCLAIMER_REQUIRED.to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LeadError::Validation(errors))
    }
}

pub struct LeadClient<T> {
    transport: T,
}

impl<T: ProxyTransport> LeadClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Posts the step-1 fields and reads the affiliate list from the reply.
    pub async fn request_quote(&self, draft: &LeadDraft) -> Result<QuoteOutcome, LeadError> {
        let request = draft.quote_request();
        debug!(zip = %request.zip_code, to = %request.move_to_zip_code, "requesting quote");
        let reply = self.transport.post(&request).await?;
        interpret_quote(reply)
    }

    /// Checks the local gate, then posts the full lead.
    pub async fn submit_lead(
        &self,
        draft: &LeadDraft,
        offered: &[AffiliateOffer],
    ) -> Result<Ack, LeadError> {
        check_submission(draft, offered)?;
        let request = draft.submission_request();
        debug!(
            affiliates = request.selected_affiliates.len(),
            "submitting lead"
        );
        let reply = self.transport.post(&request).await?;
        interpret_submission(reply)
    }
}

pub fn interpret_quote(reply: ProxyReply) -> Result<QuoteOutcome, LeadError> {
    let body = accepted_body(reply, "quote")?;
    Ok(QuoteOutcome {
        affiliates: body.brands.unwrap_or_default(),
    })
}

/// A submission counts only when the reply carries the success marker.
pub fn interpret_submission(reply: ProxyReply) -> Result<Ack, LeadError> {
    let raw = reply.body.clone();
    accepted_body(reply, "submission")?;
    Ok(Ack { body: raw })
}

fn accepted_body(reply: ProxyReply, call: &'static str) -> Result<ProxyResponse, LeadError> {
    if !reply.is_success() {
        return Err(status_error(reply));
    }
    let body: ProxyResponse = serde_json::from_value(reply.body)
        .map_err(|err| TransportError::Body(err.to_string()))?;
    if body.is_success() {
        Ok(body)
    } else {
        warn!(call, msg = ?body.msg, reason = ?body.reason, "lead was not accepted");
        Err(LeadError::Rejected {
            message: body.msg,
            reason: body.reason,
        })
    }
}

fn status_error(reply: ProxyReply) -> LeadError {
    match reply.status {
        400 => {
            let messages: Vec<String> = serde_json::from_value::<FieldErrorsBody>(reply.body)
                .map(|body| body.errors.into_iter().map(|e| e.message).collect())
                .unwrap_or_default();
            if messages.is_empty() {
                LeadError::Validation(vec!["The request was rejected as invalid.".to_string()])
            } else {
                LeadError::Validation(messages)
            }
        }
        429 => {
            let message = serde_json::from_value::<ErrorBody>(reply.body)
                .map(|body| body.error)
                .ok()
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "Too many requests, please try again later.".to_string());
            LeadError::RateLimited(message)
        }
        status => {
            let details = serde_json::from_value::<ErrorBody>(reply.body)
                .ok()
                .and_then(|body| body.details.or(body.message));
            warn!(status, details = ?details, "proxy call failed");
            LeadError::Upstream { status, details }
        }
    }
}
