use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::fetch::Fetch;
use crate::parser::records::{self, LaunchRecord};
use crate::parser::{fragments, sections};
use crate::postprocess::{self, LaunchKind};

/// Fetch the schedule page and extract. Any fetch failure yields an empty
/// list so the caller can move on to the fallback source.
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
            warn!("Primary source {} failed: {}", url, e);
            Vec::new()
        }
    }
}

/// Fragments → sections → filtered, backfilled, deduplicated records.
pub fn extract(html: &str, kind: LaunchKind, limit: usize, now: DateTime<Local>) -> Vec<LaunchRecord> {
    let frags = fragments::fragments(html);
    let raw = sections::accumulate(&frags, now);
    info!("Primary: {} fragments, {} sections", frags.len(), raw.len());

    let candidates = postprocess::retain_candidates(raw, kind, now);
    let records: Vec<LaunchRecord> = candidates.iter().filter_map(records::from_section).collect();
    let result = postprocess::finalize(records, kind, limit);
    info!("Primary: {} {} launches after filtering", result.len(), kind.as_str());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticFetcher;
    use chrono::TimeZone;

    const URL: &str = "https://schedule.test/";

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/schedule.html").unwrap()
    }

    fn names(records: &[LaunchRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn upcoming_launches_in_order() {
        let records = extract(&fixture(), LaunchKind::Next, 10, now());
        assert_eq!(names(&records), vec!["Starlink 10-5", "Owl Night Long", "Sentinel-6B"]);

        let starlink = &records[0];
        assert_eq!(starlink.vehicle, "Falcon 9");
        assert_eq!(starlink.provider, "SpaceX");
        assert_eq!(starlink.t0.as_deref(), Some("June 10 2025 13:30 UTC"));
        assert_eq!(starlink.formatted_date, "Jun 10");
        assert_eq!(records[2].formatted_date, "Jun 20");
        assert_eq!(starlink.pad.location.state, "FL");
        assert!(starlink.launch_description.starts_with("A SpaceX Falcon 9 rocket"));

        let electron = &records[1];
        assert_eq!(electron.provider, "Rocket Lab");
        assert_eq!(electron.pad.name, "Launch Complex 1, Mahia Peninsula");
        assert_eq!(electron.pad.location.state, "");
    }

    #[test]
    fn past_launches_most_recent_first() {
        let records = extract(&fixture(), LaunchKind::Past, 10, now());
        assert_eq!(names(&records), vec!["Soyuz MS-27", "ViaSat-3 F2"]);
        assert_eq!(records[0].vehicle, "Soyuz-2-1a");
        assert_eq!(records[0].provider, "Roscosmos");
        assert_eq!(records[1].provider, "ULA");
    }

    #[test]
    fn repeated_header_appears_once() {
        let records = extract(&fixture(), LaunchKind::Next, 10, now());
        assert_eq!(records.iter().filter(|r| r.name == "Starlink 10-5").count(), 1);
    }

    #[test]
    fn unknown_provider_never_surfaces() {
        let records = extract(&fixture(), LaunchKind::Next, 10, now());
        assert!(records.iter().all(|r| r.provider != "Unknown"));
        assert!(!names(&records).contains(&"Tianwen"));
    }

    #[test]
    fn limit_truncates() {
        let records = extract(&fixture(), LaunchKind::Next, 2, now());
        assert_eq!(names(&records), vec!["Starlink 10-5", "Owl Night Long"]);
    }

    #[test]
    fn identical_input_identical_output() {
        let html = fixture();
        let a = extract(&html, LaunchKind::Next, 10, now());
        let b = extract(&html, LaunchKind::Next, 10, now());
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn impossible_header_date_is_never_dated_now() {
        let html = "<html><body><h3>February 31 Falcon 9 • Starlink 9-9</h3></body></html>";
        assert!(extract(html, LaunchKind::Next, 10, now()).is_empty());
        assert!(extract(html, LaunchKind::Past, 10, now()).is_empty());
    }

    #[test]
    fn page_without_schedule_is_empty() {
        let html = "<html><body><div>Home</div><p>Nothing scheduled at the moment, check back later.</p></body></html>";
        assert!(extract(html, LaunchKind::Next, 10, now()).is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_is_empty_not_error() {
        let fetcher = StaticFetcher::default().status(URL, 500);
        assert!(scrape(&fetcher, URL, LaunchKind::Next, 10, now()).await.is_empty());

        let fetcher = StaticFetcher::default().timeout(URL);
        assert!(scrape(&fetcher, URL, LaunchKind::Next, 10, now()).await.is_empty());
        assert_eq!(fetcher.calls_to(URL), 1);
    }
}
