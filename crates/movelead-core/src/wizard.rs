//! Four-step wizard controller.
//!
//! The controller owns the draft, the current step, the affiliate offers of
//! the latest quote and the error regions. Network work is split in two
//! halves: `begin_*` validates and hands out a [`RequestTicket`], and
//! `complete_*` applies the result. Only the newest ticket is honoured, and
//! only while the user is still on the step that issued it.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use movelead_domain::{AffiliateOffer, LeadDraft};

use crate::affiliates::{displayed_offers, render_affiliates, AffiliateListView};
use crate::client::{check_submission, Ack, QuoteOutcome};
use crate::error::{LeadError, WizardError};
use crate::report::{ErrorRegion, ErrorReporter};
use crate::time::Clock;
use crate::validation::{
    validate_contact_step, validate_name_step, validate_quote_step, ValidationRules,
};

/// Page the browser is sent to after an accepted submission.
pub const CONFIRMATION_PATH: &str = "/thank-you.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    Step1Quote,
    Step2Name,
    Step3Contact,
    Step4Review,
}

impl WizardStep {
    pub const COUNT: u8 = 4;

    pub fn number(self) -> u8 {
        match self {
            WizardStep::Step1Quote => 1,
            WizardStep::Step2Name => 2,
            WizardStep::Step3Contact => 3,
            WizardStep::Step4Review => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Step1Quote => "Your move",
            WizardStep::Step2Name => "Your name",
            WizardStep::Step3Contact => "Contact details",
            WizardStep::Step4Review => "Review and submit",
        }
    }

    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Step1Quote => None,
            WizardStep::Step2Name => Some(WizardStep::Step1Quote),
            WizardStep::Step3Contact => Some(WizardStep::Step2Name),
            WizardStep::Step4Review => Some(WizardStep::Step3Contact),
        }
    }

    pub fn region(self) -> ErrorRegion {
        match self {
            WizardStep::Step1Quote => ErrorRegion::Step1,
            WizardStep::Step2Name => ErrorRegion::Step2,
            WizardStep::Step3Contact => ErrorRegion::Step3,
            WizardStep::Step4Review => ErrorRegion::Step4,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Quote,
    Submit,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Quote => write!(f, "quote"),
            Operation::Submit => write!(f, "submit"),
        }
    }
}

/// Identifies one in-flight network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    operation: Operation,
    step: WizardStep,
}

impl RequestTicket {
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

/// What applying a network result did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Advanced(WizardStep),
    /// The call failed; messages are in the step's region.
    Stayed(WizardStep),
    Redirect(&'static str),
    /// The result belonged to a superseded ticket or an abandoned step.
    Stale,
}

pub struct WizardController {
    step: WizardStep,
    draft: LeadDraft,
    offers: Vec<AffiliateOffer>,
    affiliate_view: AffiliateListView,
    errors: ErrorReporter,
    rules: ValidationRules,
    clock: Arc<dyn Clock>,
    in_flight: Option<RequestTicket>,
    next_ticket: u64,
    /// Set once the review step has pre-selected the current offers.
    selection_seeded: bool,
}

impl WizardController {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_rules(ValidationRules::default(), clock)
    }

    pub fn with_rules(rules: ValidationRules, clock: Arc<dyn Clock>) -> Self {
        Self {
            step: WizardStep::Step1Quote,
            draft: LeadDraft::default(),
            offers: Vec::new(),
            affiliate_view: AffiliateListView::default(),
            errors: ErrorReporter::new(),
            rules,
            clock,
            in_flight: None,
            next_ticket: 0,
            selection_seeded: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &LeadDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut LeadDraft {
        &mut self.draft
    }

    pub fn errors(&self) -> &ErrorReporter {
        &self.errors
    }

    /// Messages in the current step's region.
    pub fn current_errors(&self) -> &[String] {
        self.errors.messages(self.step.region())
    }

    /// Every offer from the latest quote.
    pub fn offers(&self) -> &[AffiliateOffer] {
        &self.offers
    }

    pub fn affiliate_view(&self) -> &AffiliateListView {
        &self.affiliate_view
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validates step 1 and opens a quote request.
    pub fn begin_quote(&mut self) -> Result<RequestTicket, WizardError> {
        self.expect_step(WizardStep::Step1Quote, "requesting a quote")?;
        self.ensure_idle()?;
        let errors = validate_quote_step(&self.draft, self.clock.today(), self.rules);
        self.gate(ErrorRegion::Step1, errors)?;
        Ok(self.issue(Operation::Quote))
    }

    /// Applies a quote result. Success replaces the offers and moves to step 2.
    pub fn complete_quote(
        &mut self,
        ticket: RequestTicket,
        result: Result<QuoteOutcome, LeadError>,
    ) -> Completion {
        if !self.settle(ticket) {
            return Completion::Stale;
        }
        match result {
            Ok(outcome) => {
                info!(affiliates = outcome.affiliates.len(), "quote accepted");
                self.offers = outcome.affiliates;
                self.draft.selected_affiliates.clear();
                self.affiliate_view = AffiliateListView::default();
                self.selection_seeded = false;
                self.errors.clear(ErrorRegion::Step1);
                self.step = WizardStep::Step2Name;
                Completion::Advanced(self.step)
            }
            Err(err) => {
                debug!(error = %err, "quote failed");
                self.errors.report(ErrorRegion::Step1, err.user_messages());
                Completion::Stayed(self.step)
            }
        }
    }

    /// Moves from step 2 to 3, or 3 to 4, when the step's rules pass.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;
        match self.step {
            WizardStep::Step2Name => {
                let errors = validate_name_step(&self.draft);
                self.gate(ErrorRegion::Step2, errors)?;
                self.step = WizardStep::Step3Contact;
            }
            WizardStep::Step3Contact => {
                let errors = validate_contact_step(&self.draft);
                self.gate(ErrorRegion::Step3, errors)?;
                self.enter_review();
            }
            step => {
                return Err(WizardError::WrongStep {
                    action: "advancing",
                    step,
                })
            }
        }
        Ok(self.step)
    }

    /// Returns to the previous step without validation. Entered values stay.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::WrongStep {
            action: "going back",
            step: self.step,
        })?;
        self.step = previous;
        Ok(previous)
    }

    /// Toggles an affiliate shown in the review step. Unknown ids are ignored.
    pub fn set_affiliate_selected(&mut self, id: &str, selected: bool) -> bool {
        let Some(index) = self
            .affiliate_view
            .items()
            .iter()
            .position(|item| item.id == id)
        else {
            return false;
        };
        if let AffiliateListView::Items(items) = &mut self.affiliate_view {
            items[index].checked = selected;
        }
        self.draft.selected_affiliates.retain(|existing| existing != id);
        if selected {
            self.draft.selected_affiliates.push(id.to_string());
        }
        true
    }

    pub fn set_disclaimer_accepted(&mut self, accepted: bool) {
        self.draft.disclaimer_accepted = accepted;
    }

    /// Runs the submission gate and opens a submit request.
    pub fn begin_submit(&mut self) -> Result<RequestTicket, WizardError> {
        self.expect_step(WizardStep::Step4Review, "submitting")?;
        self.ensure_idle()?;
        if let Err(err) = check_submission(&self.draft, displayed_offers(&self.offers)) {
            let messages = err.user_messages();
            self.errors.report(ErrorRegion::Step4, messages.clone());
            return Err(WizardError::Validation(messages));
        }
        self.errors.clear(ErrorRegion::Step4);
        Ok(self.issue(Operation::Submit))
    }

    pub fn complete_submit(
        &mut self,
        ticket: RequestTicket,
        result: Result<Ack, LeadError>,
    ) -> Completion {
        if !self.settle(ticket) {
            return Completion::Stale;
        }
        match result {
            Ok(_) => {
                info!("lead submitted");
                Completion::Redirect(CONFIRMATION_PATH)
            }
            Err(err) => {
                debug!(error = %err, "submission failed");
                self.errors.report(ErrorRegion::Step4, err.user_messages());
                Completion::Stayed(self.step)
            }
        }
    }

    /// Discards the session and starts over on step 1. Results of requests
    /// issued before the restart are dropped when they arrive.
    pub fn restart(&mut self) {
        self.step = WizardStep::Step1Quote;
        self.draft = LeadDraft::default();
        self.offers.clear();
        self.affiliate_view = AffiliateListView::default();
        self.errors = ErrorReporter::new();
        self.in_flight = None;
        self.selection_seeded = false;
    }

    /// The offers the review step lets the user choose from.
    pub fn selectable_offers(&self) -> &[AffiliateOffer] {
        displayed_offers(&self.offers)
    }

    /// Renders the offers. The first entry after a quote checks every
    /// displayed offer; later entries keep the user's choices.
    fn enter_review(&mut self) {
        let mut view = render_affiliates(&self.offers);
        if self.selection_seeded {
            if let AffiliateListView::Items(items) = &mut view {
                for item in items.iter_mut() {
                    item.checked = self.draft.is_affiliate_selected(&item.id);
                }
            }
        } else {
            self.draft.selected_affiliates = view.ids();
            self.selection_seeded = true;
        }
        self.affiliate_view = view;
        self.step = WizardStep::Step4Review;
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                action,
                step: self.step,
            })
        }
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        match self.in_flight {
            Some(ticket) => Err(WizardError::Busy(ticket.operation)),
            None => Ok(()),
        }
    }

    fn gate(&mut self, region: ErrorRegion, errors: Vec<String>) -> Result<(), WizardError> {
        if errors.is_empty() {
            self.errors.clear(region);
            Ok(())
        } else {
            self.errors.report(region, errors.clone());
            Err(WizardError::Validation(errors))
        }
    }

    fn issue(&mut self, operation: Operation) -> RequestTicket {
        self.next_ticket += 1;
        let ticket = RequestTicket {
            id: self.next_ticket,
            operation,
            step: self.step,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Releases the in-flight slot for `ticket`; false when the result must be dropped.
    fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.in_flight != Some(ticket) {
            debug!(ticket = ticket.id, "dropping result of superseded request");
            return false;
        }
        self.in_flight = None;
        if self.step != ticket.step {
            debug!(
                ticket = ticket.id,
                issued_on = %ticket.step,
                now_on = %self.step,
                "dropping result for a step the user left"
            );
            return false;
        }
        true
    }
}
