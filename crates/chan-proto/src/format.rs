//! Display formatting for amounts, dates, durations and explorer links.
//!
//! Every function here is total: any input in the declared domain produces a
//! printable string, so renderers never branch on formatting failures.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Placeholder for values the snapshot did not carry.
pub const MISSING: &str = "-";

/// Unit used to display satoshi amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Sat,
    Btc,
    Msat,
}

impl Currency {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sat => "sat",
            Self::Btc => "btc",
            Self::Msat => "msat",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sat" | "sats" => Ok(Self::Sat),
            "btc" => Ok(Self::Btc),
            "msat" | "msats" => Ok(Self::Msat),
            other => Err(format!("unknown currency '{other}' (expected sat, btc or msat)")),
        }
    }
}

/// Amount formatter bound to a display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Price {
    pub currency: Currency,
}

impl Price {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Format a satoshi amount in the configured unit.
    pub fn format(&self, sats: u64) -> String {
        match self.currency {
            Currency::Sat => {
                let unit = if sats == 1 { "sat" } else { "sats" };
                format!("{} {}", group_thousands(sats as u128), unit)
            }
            Currency::Msat => format!("{} msat", group_thousands(sats as u128 * 1000)),
            Currency::Btc => {
                let whole = sats / 100_000_000;
                let frac = sats % 100_000_000;
                format!("{}.{:08} BTC", whole, frac)
            }
        }
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// True when chrono can format every item of the `strftime` pattern.
pub fn is_valid_date_format(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

/// Format `ts` with `pattern`, falling back to `DEFAULT_DATE_FORMAT` when
/// the pattern is malformed.
pub fn format_date(ts: DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", ts.format(DEFAULT_DATE_FORMAT));
    }
    out
}

/// Coarse distance between `ts` and `now`, e.g. `"3 days"`.
///
/// Timestamps in the future are treated as `now`.
pub fn date_difference(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(ts).num_seconds().max(0) as u64;
    let (n, unit) = match secs {
        s if s < 60 => (s, "second"),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// `"<difference> ago (<date>)"`, or `-` when the timestamp is unknown.
pub fn last_update(ts: Option<DateTime<Utc>>, now: DateTime<Utc>, pattern: &str) -> String {
    match ts {
        Some(ts) => format!(
            "{} ago ({})",
            date_difference(ts, now),
            format_date(ts, pattern)
        ),
        None => MISSING.to_string(),
    }
}

/// Compact duration, two most significant units: `"3d 4h"`, `"12m 3s"`.
pub fn format_duration(secs: u64) -> String {
    let d = secs / 86_400;
    let h = (secs % 86_400) / 3_600;
    let m = (secs % 3_600) / 60;
    let s = secs % 60;
    if d > 0 {
        format!("{d}d {h}h")
    } else if h > 0 {
        format!("{h}h {m}m")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

pub fn format_optional_duration(secs: Option<u64>) -> String {
    secs.map(format_duration)
        .unwrap_or_else(|| MISSING.to_string())
}

/// Block explorer URL builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    pub transaction_explorer: String,
    pub node_explorer: String,
}

impl Links {
    pub fn new(transaction_explorer: impl Into<String>, node_explorer: impl Into<String>) -> Self {
        Self {
            transaction_explorer: transaction_explorer.into(),
            node_explorer: node_explorer.into(),
        }
    }

    pub fn transaction(&self, txid: &str) -> Option<String> {
        join_url(&self.transaction_explorer, txid)
    }

    pub fn node(&self, pubkey: &str) -> Option<String> {
        join_url(&self.node_explorer, pubkey)
    }
}

fn join_url(base: &str, id: &str) -> Option<String> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    if base.is_empty() {
        return Some(id.to_string());
    }
    Some(format!("{}/{}", base.trim_end_matches('/'), id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_price_units() {
        assert_eq!(Price::new(Currency::Sat).format(1), "1 sat");
        assert_eq!(Price::new(Currency::Sat).format(1_500_000), "1,500,000 sats");
        assert_eq!(Price::new(Currency::Btc).format(150_000_000), "1.50000000 BTC");
        assert_eq!(Price::new(Currency::Btc).format(42), "0.00000042 BTC");
        assert_eq!(Price::new(Currency::Msat).format(2), "2,000 msat");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("SATS".parse::<Currency>(), Ok(Currency::Sat));
        assert_eq!("btc".parse::<Currency>(), Ok(Currency::Btc));
        assert!("eur".parse::<Currency>().is_err());
    }

    #[test]
    fn test_date_difference_units() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let ago = |secs: i64| now - chrono::Duration::seconds(secs);
        assert_eq!(date_difference(ago(5), now), "5 seconds");
        assert_eq!(date_difference(ago(60), now), "1 minute");
        assert_eq!(date_difference(ago(3 * 3600), now), "3 hours");
        assert_eq!(date_difference(ago(2 * 86_400), now), "2 days");
        assert_eq!(date_difference(ago(65 * 86_400), now), "2 months");
        assert_eq!(date_difference(ago(800 * 86_400), now), "2 years");
        assert_eq!(date_difference(now + chrono::Duration::hours(1), now), "0 seconds");
    }

    #[test]
    fn test_last_update_line() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 5, 30, 12, 0, 0).unwrap();
        assert_eq!(
            last_update(Some(ts), now, DEFAULT_DATE_FORMAT),
            "2 days ago (30/05/2024 12:00)"
        );
        assert_eq!(last_update(None, now, DEFAULT_DATE_FORMAT), MISSING);
    }

    #[test]
    fn test_malformed_date_pattern_falls_back() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 30, 12, 0, 0).unwrap();
        assert!(!is_valid_date_format("%Y-%"));
        assert!(!is_valid_date_format("%Q"));
        assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));
        assert_eq!(format_date(ts, "%Y-%"), "30/05/2024 12:00");
        assert_eq!(
            last_update(Some(ts), ts, "%Y-%"),
            "0 seconds ago (30/05/2024 12:00)"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(12 * 60 + 3), "12m 3s");
        assert_eq!(format_duration(5 * 3600 + 120), "5h 2m");
        assert_eq!(format_duration(3 * 86_400 + 4 * 3600 + 59), "3d 4h");
        assert_eq!(format_optional_duration(None), MISSING);
    }

    #[test]
    fn test_links() {
        let links = Links::new("https://mempool.space/tx/", "https://1ml.com/node");
        assert_eq!(
            links.transaction("ab12").as_deref(),
            Some("https://mempool.space/tx/ab12")
        );
        assert_eq!(
            links.node("02aa").as_deref(),
            Some("https://1ml.com/node/02aa")
        );
        assert_eq!(links.transaction(""), None);
        assert_eq!(Links::new("", "").node("02aa").as_deref(), Some("02aa"));
    }
}
