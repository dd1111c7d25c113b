//! Review-step affiliate list.

use std::fmt::Write as _;

use movelead_domain::AffiliateOffer;

pub const MAX_DISPLAYED_AFFILIATES: usize = 4;
pub const NO_AFFILIATES_MESSAGE: &str = "No affiliates available.";

/// A checkable entry in the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliateItem {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
    pub disclosure: String,
    pub checked: bool,
}

impl From<&AffiliateOffer> for AffiliateItem {
    fn from(offer: &AffiliateOffer) -> Self {
        Self {
            id: offer.id.clone(),
            name: offer.name.clone(),
            logo: offer.logo.clone(),
            disclosure: offer.disclosure.clone(),
            checked: true,
        }
    }
}

/// What the review step shows: a bounded list, or a single placeholder line
/// when nothing was offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffiliateListView {
    Items(Vec<AffiliateItem>),
    Placeholder(&'static str),
}

impl Default for AffiliateListView {
    fn default() -> Self {
        AffiliateListView::Placeholder(NO_AFFILIATES_MESSAGE)
    }
}

impl AffiliateListView {
    pub fn items(&self) -> &[AffiliateItem] {
        match self {
            AffiliateListView::Items(items) => items,
            AffiliateListView::Placeholder(_) => &[],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, AffiliateListView::Placeholder(_))
    }

    pub fn ids(&self) -> Vec<String> {
        self.items().iter().map(|item| item.id.clone()).collect()
    }

    /// Plain-text rendering, one block per affiliate.
    pub fn to_text(&self) -> String {
        let items = match self {
            AffiliateListView::Placeholder(message) => return format!("- {message}\n"),
            AffiliateListView::Items(items) => items,
        };
        let mut out = String::new();
        for item in items {
            let mark = if item.checked { "x" } else { " " };
            let _ = write!(out, "[{mark}] {}", item.name);
            if let Some(logo) = &item.logo {
                let _ = write!(out, " <{logo}>");
            }
            out.push('\n');
            if !item.disclosure.is_empty() {
                let _ = writeln!(out, "    {}", item.disclosure);
            }
        }
        out
    }
}

/// Renders at most [`MAX_DISPLAYED_AFFILIATES`] offers, each pre-checked.
pub fn render_affiliates(offers: &[AffiliateOffer]) -> AffiliateListView {
    if offers.is_empty() {
        return AffiliateListView::default();
    }
    AffiliateListView::Items(
        offers
            .iter()
            .take(MAX_DISPLAYED_AFFILIATES)
            .map(AffiliateItem::from)
            .collect(),
    )
}

/// The prefix of `offers` the user can actually select from.
pub fn displayed_offers(offers: &[AffiliateOffer]) -> &[AffiliateOffer] {
    &offers[..offers.len().min(MAX_DISPLAYED_AFFILIATES)]
}
