//! Interactive terminal front-end for the lead wizard.
//!
//! Stands in for the browser page: prompts for each step's fields, drives a
//! [`WizardSession`] and prints the controller's error regions.

pub mod output;
pub mod prompts;
pub mod render;

use std::env;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use movelead_core::{
    AffiliateListView, Completion, LeadClient, ProxyTransport, SystemClock, WizardController,
    WizardError, WizardSession, WizardStep,
};
use movelead_domain::LeadDraft;

use crate::transport::{HttpProxyTransport, DEFAULT_PROXY_URL, DEFAULT_TIMEOUT};

pub use prompts::{DialoguerPrompter, Prompter};

pub const PROXY_URL_VAR: &str = "MOVELEAD_PROXY_URL";

const CONSENT_PROMPT: &str =
    "I accept the terms of service and consent to be contacted by the selected movers";

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("could not build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

/// How a terminal session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardExit {
    Submitted { confirmation: &'static str },
    Abandoned,
}

/// Runs the wizard against the relay named by `MOVELEAD_PROXY_URL`.
pub async fn run_terminal() -> Result<WizardExit, TerminalError> {
    let url = env::var(PROXY_URL_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());
    let transport = HttpProxyTransport::new(url, DEFAULT_TIMEOUT)?;
    info!(url = transport.url(), "wizard posting to relay");

    let controller = WizardController::new(Arc::new(SystemClock));
    let mut session = WizardSession::new(controller, LeadClient::new(transport));
    run_wizard(&mut session, &mut DialoguerPrompter::new()).await
}

pub async fn run_wizard<T, P>(
    session: &mut WizardSession<T>,
    prompter: &mut P,
) -> Result<WizardExit, TerminalError>
where
    T: ProxyTransport,
    P: Prompter,
{
    loop {
        let step = session.controller().step();
        output::section(render::step_header(step));

        match step {
            WizardStep::Step1Quote => {
                fill_quote(session.controller_mut().draft_mut(), prompter)?;
                output::info("Looking up movers for your route...");
                match session.request_quote().await {
                    Ok(Completion::Stayed(_)) => {
                        show_errors(session.controller());
                        if !prompter.confirm("Try again?", true)? {
                            return Ok(WizardExit::Abandoned);
                        }
                    }
                    Ok(_) => {}
                    Err(WizardError::Validation(_)) => show_errors(session.controller()),
                    Err(err) => return Err(err.into()),
                }
            }
            WizardStep::Step2Name => {
                fill_names(session.controller_mut().draft_mut(), prompter)?;
                step_or_back(session.controller_mut(), prompter)?;
            }
            WizardStep::Step3Contact => {
                fill_contact(session.controller_mut().draft_mut(), prompter)?;
                step_or_back(session.controller_mut(), prompter)?;
            }
            WizardStep::Step4Review => {
                if let Some(exit) = review(session, prompter).await? {
                    return Ok(exit);
                }
            }
        }
    }
}

fn show_errors(controller: &WizardController) {
    let region = render::error_region(controller.step().region(), controller.current_errors());
    if !region.is_empty() {
        output::error(region.trim_end());
    }
}

fn fill_quote<P: Prompter>(draft: &mut LeadDraft, prompter: &mut P) -> Result<(), TerminalError> {
    draft.zip_code = prompter.text("Moving from (ZIP code)", &draft.zip_code)?;
    draft.move_to_zip_code = prompter.text("Moving to (ZIP code)", &draft.move_to_zip_code)?;
    draft.move_to_state = prompter.text("Destination state", &draft.move_to_state)?;
    draft.move_date = prompter.text("Move date (YYYY-MM-DD)", &draft.move_date)?;
    draft.moving_size = prompter.text("Moving size", &draft.moving_size)?;
    draft.long_distance_custom =
        prompter.confirm("Is this a long-distance move?", draft.long_distance_custom)?;
    Ok(())
}

fn fill_names<P: Prompter>(draft: &mut LeadDraft, prompter: &mut P) -> Result<(), TerminalError> {
    draft.first_name = prompter.text("First name", &draft.first_name)?;
    draft.last_name = prompter.text("Last name", &draft.last_name)?;
    Ok(())
}

fn fill_contact<P: Prompter>(draft: &mut LeadDraft, prompter: &mut P) -> Result<(), TerminalError> {
    draft.phone_number = prompter.text("Phone number", &draft.phone_number)?;
    draft.email_address = prompter.text("Email address", &draft.email_address)?;
    Ok(())
}

fn step_or_back<P: Prompter>(
    controller: &mut WizardController,
    prompter: &mut P,
) -> Result<(), TerminalError> {
    if prompter.choose("Continue", &["Next", "Back"])? == 0 {
        match controller.next() {
            Ok(_) => {}
            Err(WizardError::Validation(_)) => show_errors(controller),
            Err(err) => return Err(err.into()),
        }
    } else {
        controller.back()?;
    }
    Ok(())
}

async fn review<T, P>(
    session: &mut WizardSession<T>,
    prompter: &mut P,
) -> Result<Option<WizardExit>, TerminalError>
where
    T: ProxyTransport,
    P: Prompter,
{
    output::block(&render::review_summary(session.controller().draft()));

    let view = session.controller().affiliate_view().clone();
    match &view {
        AffiliateListView::Placeholder(_) => output::block(&view.to_text()),
        AffiliateListView::Items(items) => {
            let labels: Vec<String> = items.iter().map(render::affiliate_label).collect();
            let defaults: Vec<bool> = items.iter().map(|item| item.checked).collect();
            let checked = prompter.check("Movers who may contact you", &labels, &defaults)?;
            for (index, item) in items.iter().enumerate() {
                session
                    .controller_mut()
                    .set_affiliate_selected(&item.id, checked.contains(&index));
            }
            output::block(&render::disclosures(&view));
        }
    }

    let accepted = prompter.confirm(
        CONSENT_PROMPT,
        session.controller().draft().disclaimer_accepted,
    )?;
    session.controller_mut().set_disclaimer_accepted(accepted);

    match prompter.choose("Ready to send?", &["Submit", "Back", "Start over", "Quit"])? {
        0 => match session.submit().await {
            Ok(Completion::Redirect(confirmation)) => {
                output::success("Thank you! Your moving request has been sent.");
                return Ok(Some(WizardExit::Submitted { confirmation }));
            }
            Ok(_) | Err(WizardError::Validation(_)) => show_errors(session.controller()),
            Err(err) => return Err(err.into()),
        },
        1 => {
            session.controller_mut().back()?;
        }
        2 => {
            session.controller_mut().restart();
            output::warning("Starting over.");
        }
        _ => return Ok(Some(WizardExit::Abandoned)),
    }
    Ok(None)
}
