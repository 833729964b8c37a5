//! Literal pattern tables behind the classifier. Each table is an ordered
//! list evaluated first-match-wins so every heuristic can be audited and
//! tested on its own.

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const UNKNOWN: &str = "Unknown";
pub const PLACEHOLDER_NAME: &str = "Unknown Mission";

static CHROME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Home|News|Archive|Schedule|Mission|Reports|Members|Sign|Live|Shop|Breaking|Search)")
        .unwrap()
});
static COPYRIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{4}\s*Spaceflight Now").unwrap());
static NAME_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Home|News|Archive|Schedule|Mission|Reports|Members|Sign|Live|Shop|Breaking|Search|Sunday|record|broken|late-night|Schedule Mission)")
        .unwrap()
});
static KNOWN_MISSION_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Starlink|Transporter|ViaSat|EscaPADE|Spaceward|Soyuz|QZS|Sentinel)").unwrap()
});

const DESCRIPTION_BOILERPLATE: &[&str] = &["Updated:", "Watch live"];

/// Navigation and site chrome that never carries launch data.
pub fn is_chrome(text: &str) -> bool {
    CHROME_RE.is_match(text)
}

pub fn is_copyright(text: &str) -> bool {
    COPYRIGHT_RE.is_match(text)
}

pub fn is_boilerplate(text: &str) -> bool {
    DESCRIPTION_BOILERPLATE.iter().any(|p| text.contains(p)) || is_chrome(text)
}

/// Names that are mis-captured page text rather than missions.
pub fn is_noise_name(name: &str) -> bool {
    NAME_NOISE_RE.is_match(name)
}

pub fn has_known_mission_prefix(name: &str) -> bool {
    KNOWN_MISSION_PREFIX_RE.is_match(name)
}

// ── Vehicles ──

const VEHICLE_PATTERNS: &[&str] = &[
    "Falcon 9", "Falcon Heavy", "Atlas 5", "Atlas V", "Delta IV", "Electron",
    "Vulcan", "New Glenn", "Starship", "SLS", "Artemis", "Ariane", "Soyuz",
    "Antares", "H3", "Hanbit-Nano", "Soyuz-2-1a",
];

static VEHICLE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    VEHICLE_PATTERNS
        .iter()
        .map(|v| Regex::new(&format!("(?i){}", regex::escape(v))).unwrap())
        .collect()
});

/// A vehicle name found inside free text, with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleMatch {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// Leftmost vehicle mention in `text`; ties go to the earlier table entry.
/// The returned name keeps the source's spelling.
pub fn find_vehicle(text: &str) -> Option<VehicleMatch> {
    VEHICLE_RES
        .iter()
        .filter_map(|re| re.find(text))
        .min_by_key(|m| m.start())
        .map(|m| VehicleMatch {
            name: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
}

// ── Providers ──

const PROVIDERS: &[(&[&str], &str)] = &[
    (&["falcon", "starlink"], "SpaceX"),
    (&["atlas", "vulcan", "delta"], "ULA"),
    (&["new glenn"], "Blue Origin"),
    (&["electron"], "Rocket Lab"),
    (&["soyuz"], "Roscosmos"),
    (&["h3"], "JAXA"),
    (&["hanbit"], "Innospace"),
];

pub fn provider_for_vehicle(vehicle: &str) -> Option<&'static str> {
    let lower = vehicle.to_lowercase();
    PROVIDERS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, provider)| *provider)
}

// ── Launch sites ──

const REGIONS: &[(&str, &str)] = &[
    ("Florida", "FL"),
    ("California", "CA"),
    ("Virginia", "VA"),
    ("Texas", "TX"),
    ("Alaska", "AK"),
    ("New Mexico", "NM"),
    ("Kazakhstan", ""),
    ("Brazil", ""),
    ("Japan", ""),
    ("New Zealand", ""),
    ("French Guiana", ""),
    ("China", ""),
    ("India", ""),
];

/// State abbreviation for a region name. Unrecognized regions map to "".
pub fn state_for_region(region: &str) -> &'static str {
    REGIONS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, state)| *state)
        .unwrap_or("")
}

// ── Mission identifiers found in body text ──

/// Name, vehicle and provider resolved together from one body fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionMatch {
    pub name: String,
    pub vehicle: &'static str,
    pub provider: &'static str,
}

struct MissionRule {
    pattern: Regex,
    name: fn(&Captures) -> String,
    vehicle: &'static str,
    provider: &'static str,
}

fn group<'a>(caps: &'a Captures, i: usize) -> &'a str {
    caps.get(i).map_or("", |m| m.as_str())
}

static MISSION_RULES: LazyLock<Vec<MissionRule>> = LazyLock::new(|| {
    vec![
        MissionRule {
            pattern: Regex::new(r"(?i)Starlink\s+(\d+-\d+|\d+)").unwrap(),
            name: |c| format!("Starlink {}", group(c, 1)),
            vehicle: "Falcon 9",
            provider: "SpaceX",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)Transporter[-\s]?(\d+)").unwrap(),
            name: |c| format!("Transporter-{}", group(c, 1)),
            vehicle: "Falcon 9",
            provider: "SpaceX",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)ViaSat[-\s]?(\d+)\s*(?:F|Flight)?\s*(\d+)?").unwrap(),
            name: |c| match c.get(2) {
                Some(flight) => format!("ViaSat-{} F{}", group(c, 1), flight.as_str()),
                None => format!("ViaSat-{}", group(c, 1)),
            },
            vehicle: "Atlas 5",
            provider: "ULA",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)ESCAPADE").unwrap(),
            name: |_| "EscaPADE".to_string(),
            vehicle: "New Glenn",
            provider: "Blue Origin",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)Spaceward").unwrap(),
            name: |_| "Spaceward".to_string(),
            vehicle: "Hanbit-Nano",
            provider: "Innospace",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)Soyuz\s+MS[-\s]?(\d+)(?:/(\d+))?").unwrap(),
            name: |c| match c.get(2) {
                Some(second) => format!("Soyuz MS-{}/{}", group(c, 1), second.as_str()),
                None => format!("Soyuz MS-{}", group(c, 1)),
            },
            vehicle: "Soyuz-2-1a",
            provider: "Roscosmos",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)QZS[-\s]?(\d+)|Michibiki\s+No\.\s*(\d+)").unwrap(),
            name: |c| {
                let n = c.get(1).or_else(|| c.get(2)).map_or("", |m| m.as_str());
                format!("QZS-{}", n)
            },
            vehicle: "H3",
            provider: "JAXA",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)Sentinel[-\s]?(\d+)([A-Z])?").unwrap(),
            name: |c| format!("Sentinel-{}{}", group(c, 1), group(c, 2)),
            vehicle: "Falcon 9",
            provider: "SpaceX",
        },
        MissionRule {
            pattern: Regex::new(r"(?i)A SpaceX Falcon 9 rocket will launch (\d+) Starlink").unwrap(),
            name: |c| format!("Starlink {}", group(c, 1)),
            vehicle: "Falcon 9",
            provider: "SpaceX",
        },
    ]
});

/// First mission rule matching `text`.
pub fn match_mission(text: &str) -> Option<MissionMatch> {
    MISSION_RULES.iter().find_map(|rule| {
        let caps = rule.pattern.captures(text)?;
        Some(MissionMatch {
            name: (rule.name)(&caps),
            vehicle: rule.vehicle,
            provider: rule.provider,
        })
    })
}
