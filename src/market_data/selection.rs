//! Asset and timeframe selection types

use std::fmt;

/// Supported assets, fixed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Xrp,
}

impl Asset {
    pub const ALL: [Asset; 4] = [Asset::Btc, Asset::Eth, Asset::Sol, Asset::Xrp];

    /// Asset name as the targets API expects it
    pub fn api_name(&self) -> &'static str {
        match self {
            Asset::Btc => "btc",
            Asset::Eth => "eth",
            Asset::Sol => "sol",
            Asset::Xrp => "xrp",
        }
    }

    /// Symbol used on the chainlink price stream
    pub fn stream_symbol(&self) -> String {
        format!("{}/usd", self.api_name())
    }

    /// Parse user input, case-insensitive and whitespace-trimmed
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "btc" | "bitcoin" => Some(Asset::Btc),
            "eth" | "ethereum" => Some(Asset::Eth),
            "sol" | "solana" => Some(Asset::Sol),
            "xrp" | "ripple" => Some(Asset::Xrp),
            _ => None,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name().to_ascii_uppercase())
    }
}

/// Supported timeframes, each with a fixed bucket duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    M5,
    M15,
    H1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::M5, Timeframe::M15, Timeframe::H1];

    /// Bucket duration in seconds
    pub fn duration_secs(&self) -> i64 {
        match self {
            Timeframe::M5 => 300,
            Timeframe::M15 => 900,
            Timeframe::H1 => 3600,
        }
    }

    /// `type` parameter value for the targets API
    pub fn api_type(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5min",
            Timeframe::M15 => "15min",
            Timeframe::H1 => "1h",
        }
    }

    /// Short label shown in prompts and on the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
        }
    }

    /// Parse user input, case-insensitive and whitespace-trimmed
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "5m" | "5min" | "5" => Some(Timeframe::M5),
            "15m" | "15min" | "15" => Some(Timeframe::M15),
            "1h" | "1hr" | "60m" | "60" => Some(Timeframe::H1),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The user-chosen (asset, timeframe) pair currently displayed.
/// Replaced wholesale on reconfiguration, never partially mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub asset: Asset,
    pub timeframe: Timeframe,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.asset, self.timeframe)
    }
}
