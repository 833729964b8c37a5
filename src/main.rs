mod config;
mod dates;
mod extract;
mod fetch;
mod parser;
mod postprocess;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use config::Settings;
use fetch::HttpFetcher;
use parser::records::LaunchRecord;
use postprocess::LaunchKind;

#[derive(Parser)]
#[command(name = "launch_scraper", about = "Rocket launch schedule scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upcoming launches, soonest first
    Next {
        /// Max launches to return
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Recent launches, most recent first
    Past {
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Upcoming and recent launches, fetched concurrently
    Both {
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Run one extractor against a saved HTML page (no network)
    Parse {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value = "next")]
        kind: LaunchKind,
        #[arg(short, long, value_enum, default_value = "primary")]
        source: Source,
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Primary,
    Secondary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Next { limit, json } => run_one(LaunchKind::Next, limit, json).await?,
        Commands::Past { limit, json } => run_one(LaunchKind::Past, limit, json).await?,
        Commands::Both { limit, json } => {
            let settings = Settings::load()?;
            let fetcher = HttpFetcher::new(&settings)?;
            let now = Local::now();
            let pb = spinner("Fetching upcoming and recent launches...");
            let (next, past) = tokio::join!(
                extract::get_launches(&fetcher, &settings, LaunchKind::Next, limit, now),
                extract::get_launches(&fetcher, &settings, LaunchKind::Past, limit, now),
            );
            pb.finish_and_clear();

            if json {
                let body = json!({ "next": next, "past": past });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("--- Next ---");
                print_table(&next);
                println!("\n--- Past ---");
                print_table(&past);
            }
        }
        Commands::Parse { file, kind, source, limit, json } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let now = Local::now();
            let records = match source {
                Source::Primary => extract::primary::extract(&html, kind, limit, now),
                Source::Secondary => extract::secondary::extract(&html, kind, limit, now),
            };
            print_records(&records, json)?;
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

async fn run_one(kind: LaunchKind, limit: usize, json: bool) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let fetcher = HttpFetcher::new(&settings)?;
    let pb = spinner(&format!("Fetching {} launches...", kind.as_str()));
    let records = extract::get_launches(&fetcher, &settings, kind, limit, Local::now()).await;
    pb.finish_and_clear();
    print_records(&records, json)
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_records(records: &[LaunchRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&json!({ "result": records }))?);
    } else {
        print_table(records);
    }
    Ok(())
}

fn print_table(records: &[LaunchRecord]) {
    if records.is_empty() {
        println!("No launches found.");
        return;
    }

    println!(
        "{:>3} | {:<8} | {:<28} | {:<14} | {:<14} | {:<28} | {:<2}",
        "#", "Date", "Mission", "Vehicle", "Provider", "Pad", "St"
    );
    println!("{}", "-".repeat(115));

    for (i, r) in records.iter().enumerate() {
        println!(
            "{:>3} | {:<8} | {:<28} | {:<14} | {:<14} | {:<28} | {:<2}",
            i + 1,
            truncate(&r.formatted_date, 8),
            truncate(&r.name, 28),
            truncate(&r.vehicle, 14),
            truncate(&r.provider, 14),
            truncate(&r.pad.location.name, 28),
            r.pad.location.state,
        );
    }

    println!("\n{} launches", records.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
