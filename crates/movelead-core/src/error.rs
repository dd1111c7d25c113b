use std::time::Duration;

use thiserror::Error;

use crate::wizard::{Operation, WizardStep};

/// Failures below the HTTP layer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("unreadable response body: {0}")]
    Body(String),
}

/// Outcome of a lead-client call that did not succeed.
#[derive(Debug, Error)]
pub enum LeadError {
    /// Rejected locally or by the relay's field checks.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("network error: {0}")]
    Network(#[from] TransportError),
    /// The upstream answered but did not report success.
    #[error("lead was not accepted: {}", describe_rejection(.message, .reason))]
    Rejected {
        message: Option<String>,
        reason: Option<String>,
    },
    /// The relay or the upstream failed with a non-success status.
    #[error("upstream failed with status {status}")]
    Upstream { status: u16, details: Option<String> },
    #[error("rate limited: {0}")]
    RateLimited(String),
}

fn describe_rejection(message: &Option<String>, reason: &Option<String>) -> String {
    match (message, reason) {
        (Some(message), Some(reason)) => format!("{message} ({reason})"),
        (Some(text), None) | (None, Some(text)) => text.clone(),
        (None, None) => "no reason given".to_string(),
    }
}

impl LeadError {
    /// Lines suitable for an error region.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            LeadError::Validation(messages) => messages.clone(),
            LeadError::Network(_) => vec![
                "We could not reach the quote service. Check your connection and try again."
                    .to_string(),
            ],
            LeadError::Rejected { message, reason } => {
                let lines: Vec<String> = [message, reason]
                    .into_iter()
                    .flatten()
                    .filter(|line| !line.trim().is_empty())
                    .cloned()
                    .collect();
                if lines.is_empty() {
                    vec!["Failed to fetch movers.".to_string()]
                } else {
                    lines
                }
            }
            LeadError::Upstream { .. } => {
                vec!["Something went wrong on our side. Please try again.".to_string()]
            }
            LeadError::RateLimited(message) => vec![message.clone()],
        }
    }
}

/// Wizard transitions refused by the controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("a {0} request is already in flight")]
    Busy(Operation),
    #[error("{action} is not available on {step}")]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },
    #[error("{}", .0.join(" "))]
    Validation(Vec<String>),
}
