//! Interactive selection prompts
//!
//! Reads from a line channel rather than stdin directly so the prompt loop
//! and the main session loop can share one reader.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::market_data::{Asset, Selection, Timeframe};

/// Spawn the stdin reader task; lines arrive trimmed
pub fn input_channel() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line.trim().to_string()).is_err() {
                break;
            }
        }
        debug!("stdin closed");
    });

    rx
}

/// Prompt for an asset and a timeframe, reprompting on invalid input.
/// Returns `None` when the line channel is exhausted.
pub async fn configure_selection(
    lines: &mut mpsc::UnboundedReceiver<String>,
) -> Option<Selection> {
    let asset = prompt_choice(lines, "Asset", &asset_choices(), Asset::parse).await?;
    let timeframe =
        prompt_choice(lines, "Timeframe", &timeframe_choices(), Timeframe::parse).await?;

    Some(Selection { asset, timeframe })
}

fn asset_choices() -> String {
    Asset::ALL
        .iter()
        .map(|asset| asset.api_name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn timeframe_choices() -> String {
    Timeframe::ALL
        .iter()
        .map(|timeframe| timeframe.label())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn prompt_choice<T>(
    lines: &mut mpsc::UnboundedReceiver<String>,
    label: &str,
    choices: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    loop {
        print!("{label} [{choices}]: ");
        let _ = std::io::stdout().flush();

        let line = lines.recv().await?;
        match parse(&line) {
            Some(value) => return Some(value),
            None => println!(
                "Invalid {}: '{}'. Valid choices: {}",
                label.to_ascii_lowercase(),
                line,
                choices
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn lines_from(inputs: &[&str]) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        for input in inputs {
            tx.send(input.to_string()).unwrap();
        }
        // drop tx so the channel reports exhaustion after the queued lines
        rx
    }

    #[test]
    fn test_valid_input_selects_directly() {
        block_on(async {
            let mut lines = lines_from(&["btc", "5m"]);
            let selection = configure_selection(&mut lines).await.unwrap();
            assert_eq!(selection.asset, Asset::Btc);
            assert_eq!(selection.timeframe, Timeframe::M5);
        });
    }

    #[test]
    fn test_invalid_input_reprompts() {
        block_on(async {
            let mut lines = lines_from(&["doge", "ETH", "weekly", "15m"]);
            let selection = configure_selection(&mut lines).await.unwrap();
            assert_eq!(selection.asset, Asset::Eth);
            assert_eq!(selection.timeframe, Timeframe::M15);
        });
    }

    #[test]
    fn test_exhausted_channel_aborts() {
        block_on(async {
            let mut lines = lines_from(&["btc"]);
            assert!(configure_selection(&mut lines).await.is_none());
        });
    }
}
