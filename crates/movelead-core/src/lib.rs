//! movelead-core
//!
//! Form logic for the moving-quote wizard: validators, error regions, the
//! step controller, the lead client and the affiliate renderer.
//! Depends on movelead-domain. No terminal I/O and no concrete HTTP stack;
//! network access goes through [`client::ProxyTransport`].

pub mod affiliates;
pub mod client;
pub mod error;
pub mod report;
pub mod session;
pub mod time;
pub mod validation;
pub mod wizard;

pub use affiliates::*;
pub use client::*;
pub use error::{LeadError, TransportError, WizardError};
pub use report::*;
pub use session::*;
pub use time::*;
pub use validation::*;
pub use wizard::*;

#[cfg(test)]
mod tests;
