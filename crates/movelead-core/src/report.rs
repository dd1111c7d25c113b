//! Per-step error regions.

use std::collections::BTreeMap;
use std::fmt;

/// Named display regions, one per wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorRegion {
    Step1,
    Step2,
    Step3,
    Step4,
}

impl ErrorRegion {
    pub fn id(self) -> &'static str {
        match self {
            ErrorRegion::Step1 => "step-1-errors",
            ErrorRegion::Step2 => "step-2-errors",
            ErrorRegion::Step3 => "step-3-errors",
            ErrorRegion::Step4 => "step-4-errors",
        }
    }
}

impl fmt::Display for ErrorRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Holds the messages currently shown in each region.
///
/// `report` replaces a region's content, so reporting the same list twice
/// leaves the same result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReporter {
    regions: BTreeMap<ErrorRegion, Vec<String>>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `region` and writes `messages` into it. Blank messages are skipped.
    pub fn report<I, S>(&mut self, region: ErrorRegion, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rendered: Vec<String> = messages
            .into_iter()
            .map(Into::into)
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .collect();
        if rendered.is_empty() {
            self.regions.remove(&region);
        } else {
            self.regions.insert(region, rendered);
        }
    }

    pub fn clear(&mut self, region: ErrorRegion) {
        self.regions.remove(&region);
    }

    pub fn messages(&self, region: ErrorRegion) -> &[String] {
        self.regions
            .get(&region)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_clear(&self, region: ErrorRegion) -> bool {
        self.messages(region).is_empty()
    }
}
