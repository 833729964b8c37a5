pub mod primary;
pub mod secondary;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::config::Settings;
use crate::fetch::Fetch;
use crate::parser::records::LaunchRecord;
use crate::postprocess::LaunchKind;

enum Stage {
    Primary,
    Secondary,
    Done(Vec<LaunchRecord>),
}

/// Primary schedule first; the fallback calendar only when that yields
/// nothing. Never fails: a double miss is an empty list.
pub async fn get_launches<F: Fetch>(
    fetcher: &F,
    settings: &Settings,
    kind: LaunchKind,
    limit: usize,
    now: DateTime<Local>,
) -> Vec<LaunchRecord> {
    let mut stage = Stage::Primary;
    loop {
        stage = match stage {
            Stage::Primary => {
                let records = primary::scrape(fetcher, &settings.primary_url, kind, limit, now).await;
                if records.is_empty() {
                    warn!("No {} launches from primary source, trying fallback", kind.as_str());
                    Stage::Secondary
                } else {
                    Stage::Done(records)
                }
            }
            Stage::Secondary => {
                let records = secondary::scrape(fetcher, &settings.secondary_url, kind, limit, now).await;
                if records.is_empty() {
                    warn!("No {} launches from any source", kind.as_str());
                }
                Stage::Done(records)
            }
            Stage::Done(records) => {
                info!("Returning {} {} launches", records.len(), kind.as_str());
                return records;
            }
        };
    }
}
