//! Drives a [`WizardController`] against a [`LeadClient`].

use crate::client::{LeadClient, ProxyTransport};
use crate::error::WizardError;
use crate::wizard::{Completion, WizardController};

/// One form session: the controller plus the client it calls.
pub struct WizardSession<T> {
    controller: WizardController,
    client: LeadClient<T>,
}

impl<T: ProxyTransport> WizardSession<T> {
    pub fn new(controller: WizardController, client: LeadClient<T>) -> Self {
        Self { controller, client }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut WizardController {
        &mut self.controller
    }

    pub fn client(&self) -> &LeadClient<T> {
        &self.client
    }

    /// Step 1 "next": validate, look up the quote, advance on success.
    pub async fn request_quote(&mut self) -> Result<Completion, WizardError> {
        let ticket = self.controller.begin_quote()?;
        let result = self.client.request_quote(self.controller.draft()).await;
        Ok(self.controller.complete_quote(ticket, result))
    }

    /// Step 4 "submit": gate, send, and report the redirect or the error.
    pub async fn submit(&mut self) -> Result<Completion, WizardError> {
        let ticket = self.controller.begin_submit()?;
        let result = self
            .client
            .submit_lead(self.controller.draft(), self.controller.selectable_offers())
            .await;
        Ok(self.controller.complete_submit(ticket, result))
    }
}
