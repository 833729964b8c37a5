use std::collections::HashSet;

use chrono::{DateTime, Local};
use tracing::debug;

use super::classify::{classify, Outcome};
use super::fragments::Fragment;
use super::rules::PLACEHOLDER_NAME;

/// Working record for one launch, from its date header to the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSection {
    pub name: String,
    pub vehicle: String,
    pub provider: String,
    pub epoch: i64,
    /// Date as matched in the header, with the current year appended when absent.
    pub date_text: String,
    pub is_net: bool,
    pub location: String,
    pub state: String,
    pub launch_time: String,
    pub description: String,
}

impl RawSection {
    pub fn dedup_key(&self) -> String {
        format!("{}-{}", self.epoch, self.name)
    }

    fn is_committable(&self) -> bool {
        !self.name.is_empty() && self.name != PLACEHOLDER_NAME
    }
}

/// Drives the classifier over fragments in document order. Holds the one
/// open section and everything committed so far.
pub struct SectionAccumulator {
    now: DateTime<Local>,
    current: Option<RawSection>,
    committed: Vec<RawSection>,
    seen: HashSet<String>,
}

impl SectionAccumulator {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now,
            current: None,
            committed: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn push(&mut self, text: &str) {
        match classify(text, self.current.as_mut(), self.now) {
            Outcome::Header(section) => {
                self.close();
                self.current = Some(section);
            }
            Outcome::InvalidDate => self.close(),
            _ => {}
        }
    }

    pub fn current(&self) -> Option<&RawSection> {
        self.current.as_ref()
    }

    /// Commit the open section, if it has a real name and an unseen key.
    fn close(&mut self) {
        let Some(section) = self.current.take() else {
            return;
        };
        if !section.is_committable() {
            return;
        }
        if self.seen.insert(section.dedup_key()) {
            let net = if section.is_net { "NET " } else { "" };
            debug!("Committed '{}' ({}{})", section.name, net, section.date_text);
            self.committed.push(section);
        } else {
            debug!("Skipping repeated section '{}'", section.name);
        }
    }

    pub fn finish(mut self) -> Vec<RawSection> {
        self.close();
        self.committed
    }
}

/// Group a fragment stream into committed sections, insertion order.
pub fn accumulate(fragments: &[Fragment], now: DateTime<Local>) -> Vec<RawSection> {
    let mut acc = SectionAccumulator::new(now);
    for fragment in fragments {
        acc.push(&fragment.text);
    }
    acc.finish()
}
