use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::dates;
use crate::fetch::Fetch;
use crate::parser::fragments::{element_text, first_descendant};
use crate::parser::records::LaunchRecord;
use crate::postprocess::{self, LaunchKind};

static CARD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"article, .launch-calendar-item, .event-item, .card, [class*="launch"], [class*="event"]"#)
        .unwrap()
});
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4, .title, a, strong").unwrap());
static DATE_ATTR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".date, time, .launch-date, [datetime]").unwrap());
static DATE_TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".date, time, .launch-date").unwrap());

// Tried in order against the card's full text; first hit wins.
static DATE_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"([A-Z][a-z]+\s+\d{1,2},?\s+\d{4})").unwrap(),
        Regex::new(r"(\d{1,2}\s+[A-Z][a-z]+\s+\d{4})").unwrap(),
        Regex::new(r"(\d{1,2}/\d{1,2}/\d{4})").unwrap(),
        Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap(),
    ]
});

const MIN_CARD_CHARS: usize = 30;
const MIN_TITLE_CHARS: usize = 5;
const CANDIDATES_PER_RESULT: usize = 3;

pub async fn scrape<F: Fetch>(
    fetcher: &F,
    url: &str,
    kind: LaunchKind,
    limit: usize,
    now: DateTime<Local>,
) -> Vec<LaunchRecord> {
    match fetcher.fetch(url).await {
        Ok(html) => extract(&html, kind, limit, now),
        Err(e) => {
            warn!("Fallback source {} failed: {}", url, e);
            Vec::new()
        }
    }
}

/// Card-based extraction. Only title and date are read; every other field
/// is "Unknown".
pub fn extract(html: &str, kind: LaunchKind, limit: usize, now: DateTime<Local>) -> Vec<LaunchRecord> {
    let doc = Html::parse_document(html);
    let cap = limit.saturating_mul(CANDIDATES_PER_RESULT);
    let mut records = Vec::new();

    for card in doc.select(&CARD_SELECTOR) {
        if records.len() >= cap {
            break;
        }
        let Some(record) = read_card(card) else {
            continue;
        };
        if kind.admits(record.epoch(), now) {
            records.push(record);
        }
    }

    info!("Fallback: {} {} candidates", records.len(), kind.as_str());
    postprocess::sort_and_truncate(records, kind, limit)
}

fn read_card(card: ElementRef) -> Option<LaunchRecord> {
    let full = element_text(card);
    let full = full.trim();
    if full.chars().count() < MIN_CARD_CHARS {
        return None;
    }

    let title = card_title(card, full)?;
    let date_text = card_date(card, full)?;
    if title.chars().count() < MIN_TITLE_CHARS {
        return None;
    }

    let epoch = dates::try_parse_epoch(&date_text).filter(|&e| e > 0)?;
    Some(LaunchRecord::from_title(&title, &date_text, epoch))
}

fn card_title(card: ElementRef, full: &str) -> Option<String> {
    first_descendant(card, &TITLE_SELECTOR)
        .map(|el| element_text(el).trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| full.lines().next().map(|l| l.trim().to_string()))
        .filter(|t| !t.is_empty())
}

fn card_date(card: ElementRef, full: &str) -> Option<String> {
    let from_attr = first_descendant(card, &DATE_ATTR_SELECTOR)
        .and_then(|el| el.value().attr("datetime"))
        .map(str::trim)
        .filter(|d| !d.is_empty());
    if let Some(d) = from_attr {
        return Some(d.to_string());
    }

    let from_text = first_descendant(card, &DATE_TEXT_SELECTOR)
        .map(|el| element_text(el).trim().to_string())
        .filter(|d| !d.is_empty());
    if from_text.is_some() {
        return from_text;
    }

    DATE_PATTERNS
        .iter()
        .find_map(|re| re.captures(full).map(|c| c[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/calendar.html").unwrap()
    }

    fn names(records: &[LaunchRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn upcoming_cards_sorted() {
        let records = extract(&fixture(), LaunchKind::Next, 10, now());
        assert_eq!(
            names(&records),
            vec!["Starship Flight 10", "Crew-11 to the ISS", "Blue Ghost 2 lunar lander", "Artemis II crewed lunar flyby"]
        );
        assert!(records.iter().all(|r| r.provider == "Unknown" && r.vehicle == "Unknown"));
        assert_eq!(records[0].t0.as_deref(), Some("June 15, 2025"));
        assert_eq!(records[0].formatted_date, "Jun 15");
        assert_eq!(records[1].t0.as_deref(), Some("14 July 2025"));
    }

    #[test]
    fn datetime_attribute_wins_over_text() {
        let records = extract(&fixture(), LaunchKind::Next, 10, now());
        let artemis = records.iter().find(|r| r.name.starts_with("Artemis")).unwrap();
        assert_eq!(artemis.t0.as_deref(), Some("2026-04-01T00:00:00Z"));
        assert_eq!(artemis.date, "1775001600");
    }

    #[test]
    fn past_cards() {
        let records = extract(&fixture(), LaunchKind::Past, 10, now());
        assert_eq!(names(&records), vec!["Transporter-13 rideshare"]);
        assert_eq!(records[0].launch_description, "Launch: Transporter-13 rideshare");
    }

    #[test]
    fn stops_after_three_candidates_per_result() {
        // The soonest card sits fourth, past the cutoff for a limit of 1.
        let html = r#"<main>
            <article><h3>December rideshare</h3><p>Targeting December 10, 2025 from Vandenberg.</p></article>
            <article><h3>November cargo run</h3><p>Targeting November 10, 2025 from Wallops.</p></article>
            <article><h3>October crew rotation</h3><p>Targeting October 10, 2025 from Kennedy.</p></article>
            <article><h3>July weather satellite</h3><p>Targeting July 10, 2025 from Vandenberg.</p></article>
        </main>"#;
        let capped = extract(html, LaunchKind::Next, 1, now());
        assert_eq!(names(&capped), vec!["October crew rotation"]);

        let uncapped = extract(html, LaunchKind::Next, 2, now());
        assert_eq!(names(&uncapped), vec!["July weather satellite", "October crew rotation"]);
    }

    #[test]
    fn cards_without_date_or_title_are_skipped() {
        let records = extract(&fixture(), LaunchKind::Next, 10, now());
        assert!(!names(&records).iter().any(|n| n.contains("newsletter") || *n == "Tiny"));
    }

    #[test]
    fn first_line_is_title_fallback() {
        let html = r#"<div class="event-row">Launch of a weather satellite
            Scheduled for 2025-07-04 from Vandenberg</div>"#;
        let records = extract(html, LaunchKind::Next, 5, now());
        assert_eq!(names(&records), vec!["Launch of a weather satellite"]);
    }

    #[test]
    fn numeric_date_formats() {
        let html = r#"<article><h3>Numeric date mission</h3><p>Target 07/04/2025 at dawn.</p></article>"#;
        let records = extract(html, LaunchKind::Next, 5, now());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].t0.as_deref(), Some("07/04/2025"));
    }
}
