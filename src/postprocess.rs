use std::collections::HashSet;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::parser::records::LaunchRecord;
use crate::parser::rules;
use crate::parser::sections::RawSection;

const MIN_NAME_CHARS: usize = 2;
const MAX_PLAIN_NAME_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchKind {
    Next,
    Past,
}

impl LaunchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LaunchKind::Next => "next",
            LaunchKind::Past => "past",
        }
    }

    /// Whether `epoch` falls on this kind's side of `now`.
    pub fn admits(self, epoch: i64, now: DateTime<Local>) -> bool {
        match self {
            LaunchKind::Past => epoch < now.timestamp(),
            LaunchKind::Next => epoch >= now.timestamp(),
        }
    }
}

/// Drop sections on the wrong side of now and names that are page noise.
pub fn retain_candidates(
    sections: Vec<RawSection>,
    kind: LaunchKind,
    now: DateTime<Local>,
) -> Vec<RawSection> {
    sections
        .into_iter()
        .filter(|s| kind.admits(s.epoch, now))
        .filter(|s| is_plausible_name(&s.name))
        .collect()
}

fn is_plausible_name(name: &str) -> bool {
    let len = name.chars().count();
    if len < MIN_NAME_CHARS || rules::is_noise_name(name) {
        return false;
    }
    len <= MAX_PLAIN_NAME_CHARS || rules::has_known_mission_prefix(name)
}

/// Soonest first for `Next`, most recent first for `Past`. Stable.
pub fn sort_by_kind(records: &mut [LaunchRecord], kind: LaunchKind) {
    match kind {
        LaunchKind::Next => records.sort_by_key(|r| r.epoch()),
        LaunchKind::Past => records.sort_by(|a, b| b.epoch().cmp(&a.epoch())),
    }
}

/// Sort, drop partial records and repeated (date, name) keys, then truncate.
pub fn finalize(mut records: Vec<LaunchRecord>, kind: LaunchKind, limit: usize) -> Vec<LaunchRecord> {
    sort_by_kind(&mut records, kind);

    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| !r.has_unknown_field())
        .filter(|r| seen.insert(r.dedup_key()))
        .take(limit)
        .collect()
}

/// Fallback-source shaping: sort and truncate only.
pub fn sort_and_truncate(mut records: Vec<LaunchRecord>, kind: LaunchKind, limit: usize) -> Vec<LaunchRecord> {
    sort_by_kind(&mut records, kind);
    records.truncate(limit);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::records::Pad;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.timestamp_opt(1_000, 0).unwrap()
    }

    fn record(name: &str, epoch: i64) -> LaunchRecord {
        LaunchRecord {
            name: name.into(),
            provider: "SpaceX".into(),
            vehicle: "Falcon 9".into(),
            pad: Pad::unknown(),
            launch_description: String::new(),
            formatted_date: String::new(),
            t0: None,
            date: epoch.to_string(),
        }
    }

    fn section(name: &str, epoch: i64) -> RawSection {
        RawSection {
            name: name.into(),
            epoch,
            ..Default::default()
        }
    }

    fn epochs(records: &[LaunchRecord]) -> Vec<i64> {
        records.iter().map(|r| r.epoch()).collect()
    }

    #[test]
    fn next_sorts_ascending_past_descending() {
        let input = vec![record("a", 100), record("b", 300), record("c", 200)];
        assert_eq!(epochs(&finalize(input.clone(), LaunchKind::Next, 10)), vec![100, 200, 300]);
        assert_eq!(epochs(&finalize(input, LaunchKind::Past, 10)), vec![300, 200, 100]);
    }

    #[test]
    fn duplicate_date_and_name_collapse() {
        let input = vec![record("Starlink 10-5", 100), record("Starlink 10-5", 100), record("Starlink 10-5", 200)];
        assert_eq!(finalize(input, LaunchKind::Next, 10).len(), 2);
    }

    #[test]
    fn unknown_fields_are_excluded() {
        let mut no_provider = record("Tianwen", 100);
        no_provider.provider = "Unknown".into();
        let mut no_vehicle = record("Tianwen 2", 110);
        no_vehicle.vehicle = "Unknown".into();
        let input = vec![no_provider, no_vehicle, record("Unknown", 120), record("Crew-12", 130)];
        let out = finalize(input, LaunchKind::Next, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Crew-12");
    }

    #[test]
    fn truncates_after_filtering() {
        let mut input: Vec<_> = (0..5).map(|i| record(&format!("Flight {}", i), 100 + i)).collect();
        input[0].provider = "Unknown".into();
        let out = finalize(input, LaunchKind::Next, 3);
        assert_eq!(epochs(&out), vec![101, 102, 103]);
    }

    #[test]
    fn side_of_now() {
        let sections = vec![section("Earlier", 999), section("Exactly now", 1_000), section("Later", 1_001)];
        let next = retain_candidates(sections.clone(), LaunchKind::Next, now());
        assert_eq!(next.iter().map(|s| s.epoch).collect::<Vec<_>>(), vec![1_000, 1_001]);
        let past = retain_candidates(sections, LaunchKind::Past, now());
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].name, "Earlier");
    }

    #[test]
    fn noise_and_short_names_dropped() {
        let sections = vec![
            section("X", 2_000),
            section("Sunday's launch was scrubbed", 2_000),
            section("broken record for cadence", 2_000),
            section("Crew-12", 2_000),
        ];
        let kept = retain_candidates(sections, LaunchKind::Next, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Crew-12");
    }

    #[test]
    fn long_names_need_a_known_prefix() {
        let long_tail = " and a much longer trailing description of the payload";
        let sections = vec![
            section(&format!("Starlink 10-5{}", long_tail), 2_000),
            section(&format!("Some payload{}", long_tail), 2_000),
        ];
        let kept = retain_candidates(sections, LaunchKind::Next, now());
        assert_eq!(kept.len(), 1);
        assert!(kept[0].name.starts_with("Starlink"));
    }

    #[test]
    fn fallback_shaping_keeps_unknowns() {
        let mut r = record("Some title", 50);
        r.provider = "Unknown".into();
        let out = sort_and_truncate(vec![record("b", 60), r], LaunchKind::Next, 5);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].epoch(), 50);
    }
}
