use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local};
use regex::Regex;
use tracing::debug;

use super::rules;
use super::sections::RawSection;
use crate::dates;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(NET\s+)?((?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d+(?:/\d+)?(?:/\d{4})?)\s*(.+)$",
    )
    .unwrap()
});
static DIGIT_UPPER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)([A-Z])").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());
static UTC_TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\((\d{4})\s*UTC\)").unwrap());
static LOCAL_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Launch time:.*?(Window opens at\s+)?(\d{1,2}:\d{2}\s*(?:a\.?m\.?|p\.?m\.?|AM|PM)?\s*(?:EST|PST|EDT|PDT|UTC|GMT)?)",
    )
    .unwrap()
});
static REGION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*$").unwrap());

const MIN_FRAGMENT_CHARS: usize = 10;
const MAX_HEADER_TAIL_CHARS: usize = 200;
const MAX_INLINE_MISSION_CHARS: usize = 50;
const MIN_DESCRIPTION_CHARS: usize = 50;
const MAX_DESCRIPTION_CHARS: usize = 500;
const TIME_CUE: &str = "Launch time:";
const SITE_CUE: &str = "Launch site:";

/// What one fragment turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Too short, chrome, or a copyright footer. Nothing was touched.
    Ignored,
    /// A date header; the section it opens.
    Header(RawSection),
    /// Looked like a header but the trailing text is page noise.
    NoiseHeader,
    /// Header whose date did not resolve to a positive epoch.
    InvalidDate,
    LaunchTime,
    LaunchSite,
    Description,
    /// Ordinary text with no section open, or nothing left to fill.
    Unmatched,
}

/// Classify one trimmed fragment. Body cues are written into `open`; a
/// header is returned for the caller to open, never applied here.
pub fn classify(text: &str, open: Option<&mut RawSection>, now: DateTime<Local>) -> Outcome {
    if text.chars().count() < MIN_FRAGMENT_CHARS || rules::is_chrome(text) || rules::is_copyright(text)
    {
        return Outcome::Ignored;
    }

    if let Some(caps) = HEADER_RE.captures(text) {
        return parse_header(caps.get(1).is_some(), &caps[2], &caps[3], now);
    }

    match open {
        Some(section) => augment(text, section),
        None => Outcome::Unmatched,
    }
}

fn parse_header(is_net: bool, date_part: &str, tail: &str, now: DateTime<Local>) -> Outcome {
    let tail = tail.trim();
    if tail.chars().count() > MAX_HEADER_TAIL_CHARS {
        debug!("Rejecting header with {} chars of trailing text", tail.chars().count());
        return Outcome::NoiseHeader;
    }
    let tail = DIGIT_UPPER_RE.replace_all(tail, "${1} ${2}");

    let mut parts = tail.split('•').map(str::trim);
    let mut vehicle = parts.next().unwrap_or_default().to_string();
    let mut mission = parts.next().unwrap_or_default().to_string();

    if let Some(found) = rules::find_vehicle(&tail) {
        let after = tail[found.end..].trim();
        if let Some(rest) = after.strip_prefix('•') {
            mission = rest.trim().to_string();
        } else if !after.is_empty()
            && mission.is_empty()
            && after.chars().count() < MAX_INLINE_MISSION_CHARS
        {
            let words: Vec<&str> = after.split_whitespace().collect();
            if words.len() <= 3 && words[0].starts_with(|c: char| c.is_ascii_uppercase()) {
                mission = words.join(" ");
            }
        }
        vehicle = found.name;
    }

    if mission == vehicle {
        mission.clear();
    }

    let date_text = if YEAR_RE.is_match(date_part) {
        date_part.to_string()
    } else {
        format!("{} {}", date_part, now.year())
    };
    let Some(epoch) = dates::try_parse_epoch(&date_text).filter(|&e| e > 0) else {
        debug!("Header date '{}' did not resolve", date_text);
        return Outcome::InvalidDate;
    };

    let provider = rules::provider_for_vehicle(&vehicle)
        .unwrap_or_default()
        .to_string();

    Outcome::Header(RawSection {
        name: mission,
        vehicle,
        provider,
        epoch,
        date_text,
        is_net,
        ..Default::default()
    })
}

/// Time, then site, then description; the first cue present wins.
fn augment(text: &str, section: &mut RawSection) -> Outcome {
    if text.contains(TIME_CUE) {
        if let Some(time) = launch_time(text) {
            section.launch_time = time;
        }
        return Outcome::LaunchTime;
    }

    if text.contains(SITE_CUE) {
        if let Some((location, state)) = launch_site(text) {
            section.location = location;
            section.state = state.to_string();
        }
        return Outcome::LaunchSite;
    }

    if text.chars().count() > MIN_DESCRIPTION_CHARS
        && !rules::is_boilerplate(text)
        && section.description.is_empty()
    {
        section.description = text
            .chars()
            .take(MAX_DESCRIPTION_CHARS)
            .collect::<String>()
            .trim()
            .to_string();

        if section.name.is_empty() || section.name == section.vehicle {
            if let Some(m) = rules::match_mission(text) {
                debug!("Mission '{}' resolved from body text", m.name);
                section.name = m.name;
                section.vehicle = m.vehicle.to_string();
                section.provider = m.provider.to_string();
            }
        }
        return Outcome::Description;
    }

    Outcome::Unmatched
}

/// "(1430 UTC)" becomes "14:30 UTC"; otherwise the first clock time after the cue.
fn launch_time(text: &str) -> Option<String> {
    if let Some(caps) = UTC_TIME_RE.captures(text) {
        let hhmm = &caps[1];
        return Some(format!("{}:{} UTC", &hhmm[..2], &hhmm[2..]));
    }
    LOCAL_TIME_RE
        .captures(text)
        .map(|caps| caps[2].trim().to_string())
}

/// Site name plus state abbreviation when the last comma segment is a region.
fn launch_site(text: &str) -> Option<(String, &'static str)> {
    let start = text.find(SITE_CUE)? + SITE_CUE.len();
    let rest = text[start..].trim();
    if rest.is_empty() {
        return None;
    }
    if let Some((site, region)) = rest.rsplit_once(',') {
        let region = region.trim();
        if REGION_RE.is_match(region) {
            return Some((site.trim().to_string(), rules::state_for_region(region)));
        }
    }
    Some((rest.to_string(), ""))
}
