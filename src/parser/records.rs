use serde::{Deserialize, Serialize};

use super::rules::{self, UNKNOWN};
use super::sections::RawSection;
use crate::dates;

const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadLocation {
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    pub name: String,
    pub location: PadLocation,
}

impl Pad {
    pub fn unknown() -> Self {
        Self::at(UNKNOWN, "")
    }

    fn at(location: &str, state: &str) -> Self {
        Pad {
            name: location.to_string(),
            location: PadLocation {
                name: location.to_string(),
                state: state.to_string(),
            },
        }
    }
}

/// One launch as handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub name: String,
    pub provider: String,
    pub vehicle: String,
    pub pad: Pad,
    pub launch_description: String,
    pub formatted_date: String,
    pub t0: Option<String>,
    /// Epoch seconds, stringified.
    pub date: String,
}

impl LaunchRecord {
    pub fn epoch(&self) -> i64 {
        self.date.parse().unwrap_or_default()
    }

    pub fn dedup_key(&self) -> String {
        format!("{}-{}", self.date, self.name)
    }

    pub fn has_unknown_field(&self) -> bool {
        self.name == UNKNOWN || self.provider == UNKNOWN || self.vehicle == UNKNOWN
    }

    /// Low-fidelity record built from a title and a date only.
    pub fn from_title(title: &str, date_text: &str, epoch: i64) -> Self {
        let name = truncate_chars(title, MAX_NAME_CHARS);
        LaunchRecord {
            launch_description: format!("Launch: {}", title),
            name,
            provider: UNKNOWN.to_string(),
            vehicle: UNKNOWN.to_string(),
            pad: Pad::unknown(),
            formatted_date: dates::format_display(date_text),
            t0: Some(date_text.to_string()),
            date: epoch.max(0).to_string(),
        }
    }
}

/// Convert a committed section, backfilling vehicle from the name and
/// provider from the vehicle. Returns `None` when the name is blank.
pub fn from_section(section: &RawSection) -> Option<LaunchRecord> {
    let name = section.name.trim();
    if name.chars().count() < 2 {
        return None;
    }

    let vehicle = if section.vehicle.is_empty() || section.vehicle == UNKNOWN {
        rules::find_vehicle(name).map_or_else(|| UNKNOWN.to_string(), |m| m.name)
    } else {
        section.vehicle.clone()
    };

    let provider = if section.provider.is_empty() || section.provider == UNKNOWN {
        rules::provider_for_vehicle(&vehicle)
            .unwrap_or(UNKNOWN)
            .to_string()
    } else {
        section.provider.clone()
    };

    let t0 = if section.launch_time.is_empty() {
        section.date_text.clone()
    } else {
        format!("{} {}", section.date_text, section.launch_time)
    };

    let pad = if section.location.is_empty() {
        Pad::unknown()
    } else {
        Pad::at(&section.location, &section.state)
    };

    let launch_description = if section.description.is_empty() {
        format!("Launch of {}", name)
    } else {
        section.description.clone()
    };

    Some(LaunchRecord {
        name: truncate_chars(name, MAX_NAME_CHARS),
        provider,
        vehicle,
        pad,
        launch_description,
        formatted_date: dates::format_display(&t0),
        t0: (!t0.is_empty()).then_some(t0),
        date: section.epoch.max(0).to_string(),
    })
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
