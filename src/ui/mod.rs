//! User Interface module
//!
//! The presenter side of the monitor: reads a consistent state snapshot on
//! its own cadence and never mutates it.

pub mod dashboard;

use colored::Colorize;

/// Welcome banner shown before the initial configuration
pub fn display_welcome_page() {
    println!();
    println!(
        "{}",
        "┌──────────────────────────────────────────────┐".bold().cyan()
    );
    println!(
        "{}",
        format!("│{:^46}│", "targetwatch - live vs. target price").bold().cyan()
    );
    println!(
        "{}",
        "└──────────────────────────────────────────────┘".bold().cyan()
    );
    println!();
    display_help();
}

/// Interactive command list
pub fn display_help() {
    println!("Commands:");
    println!("  config (c) - choose a new asset and timeframe");
    println!("  help   (h) - show this list");
    println!("  quit   (q) - exit");
    println!();
}
