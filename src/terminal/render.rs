//! Plain-text views of wizard state.

use std::fmt::Write;

use movelead_core::{AffiliateItem, AffiliateListView, ErrorRegion, WizardStep};
use movelead_domain::LeadDraft;

pub fn step_header(step: WizardStep) -> String {
    format!("Step {} of {}: {}", step.number(), WizardStep::COUNT, step.title())
}

/// Region id followed by one bullet per message; empty when there is nothing to show.
pub fn error_region(region: ErrorRegion, messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let mut out = format!("{}:\n", region.id());
    for message in messages {
        let _ = writeln!(out, "  - {message}");
    }
    out
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

pub fn review_summary(draft: &LeadDraft) -> String {
    let rows = [
        ("From ZIP", draft.zip_code.as_str()),
        ("To ZIP", draft.move_to_zip_code.as_str()),
        ("To state", draft.move_to_state.as_str()),
        ("Move date", draft.move_date.as_str()),
        ("Moving size", draft.moving_size.as_str()),
        (
            "Long distance",
            if draft.long_distance_custom { "yes" } else { "no" },
        ),
        ("First name", draft.first_name.as_str()),
        ("Last name", draft.last_name.as_str()),
        ("Phone", draft.phone_number.as_str()),
        ("Email", draft.email_address.as_str()),
    ];
    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<14}{}", or_dash(value));
    }
    out
}

/// Label shown next to an affiliate checkbox.
pub fn affiliate_label(item: &AffiliateItem) -> String {
    match &item.logo {
        Some(logo) => format!("{} <{logo}>", item.name),
        None => item.name.clone(),
    }
}

/// Disclosure text for every displayed affiliate, shown above the consent prompt.
pub fn disclosures(view: &AffiliateListView) -> String {
    let mut out = String::new();
    for item in view.items() {
        if !item.disclosure.trim().is_empty() {
            let _ = writeln!(out, "{}: {}", item.name, item.disclosure);
        }
    }
    out
}
