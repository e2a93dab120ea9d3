//! Dashboard frame rendering

use std::io::{self, Write};

use chrono::Local;
use colored::{ColoredString, Colorize};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::market_data::{FetchStatus, SharedState, StreamStatus};

/// Render one dashboard frame.
///
/// A reconfiguration in progress means the state is mid-transition; the
/// frame is skipped rather than drawn from it.
pub fn render(state: &SharedState) -> io::Result<()> {
    if state.is_configuring {
        return Ok(());
    }

    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    let title = format!(
        "{} {} TARGET MONITOR",
        state.selection.asset, state.selection.timeframe
    );
    println!(
        "{}",
        "┌──────────────────────────────────────────────┐".bold().cyan()
    );
    println!("{}", format!("│{:^46}│", title).bold().cyan());
    println!(
        "{}",
        "└──────────────────────────────────────────────┘".bold().cyan()
    );
    println!();

    match &state.snapshot.bucket {
        Some(bucket) => println!(
            "{} {} {}",
            "Bucket:".dimmed(),
            bucket.start_epoch(),
            format!("({})", bucket.iso_timestamp()).dimmed()
        ),
        None => println!(
            "{} {}",
            "Bucket:".dimmed(),
            "waiting for first snapshot".yellow()
        ),
    }

    if let Some(utc_date) = state
        .snapshot
        .payload
        .as_ref()
        .and_then(|payload| payload.get("utc_date"))
        .and_then(|value| value.as_str())
    {
        println!("{} {}", "Market info:".dimmed(), utc_date);
    }

    println!();

    let target_label = format!("Target price ({}):", state.selection.timeframe);
    match state.snapshot.target_price {
        Some(price) => println!(
            "{} {}",
            target_label.blue(),
            format!("{price} USD").bold().blue()
        ),
        None if state.snapshot.payload.is_some() => {
            println!("{} {}", target_label.yellow(), "not present in snapshot")
        }
        None => println!("{} {}", target_label.yellow(), "waiting..."),
    }

    match state.live_price {
        Some(price) => println!(
            "{} {} {}",
            format!("Live {} price:", state.selection.asset).green(),
            format!("{price:.2}").bold().green(),
            "USD".dimmed()
        ),
        None => println!(
            "{}",
            format!(
                "Waiting for {} stream price...",
                state.selection.asset.stream_symbol()
            )
            .yellow()
        ),
    }

    println!();
    println!(
        "{} {}   {} {}",
        "Stream:".dimmed(),
        stream_status_text(state.stream_status),
        "Fetch:".dimmed(),
        fetch_status_text(state.snapshot.fetch_status)
    );
    println!(
        "{} {}",
        "Updated at:".dimmed(),
        Local::now().format("%d.%m.%Y %H:%M:%S")
    );
    println!();
    println!("{}", "config (c) | help (h) | quit (q)".dimmed());

    stdout.flush()
}

fn stream_status_text(status: StreamStatus) -> ColoredString {
    match status {
        StreamStatus::Connecting => status.label().yellow(),
        StreamStatus::Open => status.label().green(),
        StreamStatus::Closed => status.label().red(),
    }
}

fn fetch_status_text(status: FetchStatus) -> ColoredString {
    match status {
        FetchStatus::Ok => "ok".green(),
        FetchStatus::RateLimited => "rate limited".yellow(),
        FetchStatus::HttpError(code) => format!("http {code}").red(),
        FetchStatus::NetworkError => "network error".red(),
    }
}
