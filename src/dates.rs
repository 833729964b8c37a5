use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;

// "November 5", "Nov. 5, 2025", "December 1/2025", "November 5/6 2025"
static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z]+)\.?\s+(\d{1,2})(?:/\d{1,2}\b)?(?:(?:,\s*|\s+|/)(\d{4}))?").unwrap()
});
static WORD_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\s+(\d+)").unwrap());

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%B %d %Y", "%d %B %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun",
    "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Epoch seconds for `text`, or `now` when nothing in it reads as a date.
///
/// The fallback keeps one bad date from stalling a whole run. It is not a
/// signal that the date is valid, so filters should use [`try_parse_epoch`].
pub fn parse_epoch(text: &str, now: DateTime<Local>) -> i64 {
    try_parse_epoch(text).unwrap_or_else(|| now.timestamp())
}

/// Strict variant of [`parse_epoch`]: `None` when the text holds no date
/// with a year.
pub fn try_parse_epoch(text: &str) -> Option<i64> {
    if let Some(dt) = generic_parse(text) {
        return Some(dt.timestamp());
    }
    month_day_year(text).map(|dt| dt.timestamp())
}

/// Short display form, "Nov 5". Never empty for non-blank input.
pub fn format_display(text: &str) -> String {
    if let Some(dt) = generic_parse(text).or_else(|| month_day_year(text)) {
        return dt.format("%b %-d").to_string();
    }
    if let Some(caps) = WORD_NUMBER_RE.captures(text) {
        return format!("{} {}", &caps[1], &caps[2]);
    }
    let head: Vec<&str> = text.split_whitespace().take(2).collect();
    if head.is_empty() {
        text.to_string()
    } else {
        head.join(" ")
    }
}

pub fn month_index(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| lower.starts_with(m))
        .map(|i| i as u32 + 1)
}

/// Whole-string parse against the well-formed layouts the sources use.
fn generic_parse(text: &str) -> Option<DateTime<Local>> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return local_midnight(date);
        }
    }
    None
}

/// Loose "<Month> <Day>[, <Year>]" scan. A missing year is left unresolved.
fn month_day_year(text: &str) -> Option<DateTime<Local>> {
    MONTH_DAY_RE.captures_iter(text).find_map(|caps| {
        let month = month_index(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        local_midnight(NaiveDate::from_ymd_opt(year, month, day)?)
    })
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}
