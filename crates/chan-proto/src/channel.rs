//! Channel records as written by the snapshot fetcher.
//!
//! Records are read-only snapshots: the dashboard never mutates a field, it
//! only swaps in a whole new `ChannelSnapshot` when the file changes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Alias shown when the partner has not announced one.
pub const UNKNOWN_ALIAS: &str = "Unknown";

/// Public info about the node on the other side of a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerNodeInfo {
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub capacity: Option<u64>,
    #[serde(default)]
    pub channel_count: Option<u32>,
    /// Hex accent colour announced by the node, e.g. `"#3399ff"`.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PartnerNodeInfo {
    /// Announced alias, or `None` when missing or blank.
    pub fn alias(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Parse `color` into RGB. Accepts `#rrggbb` and `rrggbb`.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.as_deref()?.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

/// One Lightning channel between the local node and a partner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelRecord {
    pub id: String,
    pub capacity: u64,
    pub local_balance: u64,
    pub remote_balance: u64,
    pub local_reserve: u64,
    pub remote_reserve: u64,
    pub received: u64,
    pub sent: u64,
    pub commit_transaction_fee: u64,
    pub commit_transaction_weight: u64,
    pub unsettled_balance: u64,

    pub is_active: bool,
    pub is_opening: bool,
    pub is_closing: bool,
    pub is_partner_initiated: bool,
    pub is_private: bool,
    pub is_static_remote_key: bool,

    /// Seconds the partner has been seen offline / online.
    pub time_offline: Option<u64>,
    pub time_online: Option<u64>,

    pub transaction_id: String,
    pub transaction_vout: u32,
    pub partner_public_key: String,

    /// Missing or `null` partner info is kept as `None`; use `partner()`.
    pub partner_node_info: Option<PartnerNodeInfo>,
}

impl ChannelRecord {
    /// Partner info with an empty placeholder when the fetcher had none.
    pub fn partner(&self) -> std::borrow::Cow<'_, PartnerNodeInfo> {
        match &self.partner_node_info {
            Some(info) => std::borrow::Cow::Borrowed(info),
            None => std::borrow::Cow::Owned(PartnerNodeInfo::default()),
        }
    }

    /// Partner alias, falling back to `"Unknown"`.
    pub fn display_alias(&self) -> &str {
        self.partner_node_info
            .as_ref()
            .and_then(PartnerNodeInfo::alias)
            .unwrap_or(UNKNOWN_ALIAS)
    }

    /// Lower-cased haystack used by the list filter.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.display_alias(),
            self.partner_public_key,
            self.id
        )
        .to_lowercase()
    }
}

/// A whole fetch result: the channels visible at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSnapshot {
    pub channels: Vec<ChannelRecord>,
    pub source: Option<PathBuf>,
}

/// Accepted on-disk shapes: `[...]` or `{ "channels": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Bare(Vec<ChannelRecord>),
    Wrapped { channels: Vec<ChannelRecord> },
}

impl ChannelSnapshot {
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let channels = match serde_json::from_str::<SnapshotDocument>(json)? {
            SnapshotDocument::Bare(channels) => channels,
            SnapshotDocument::Wrapped { channels } => channels,
        };
        Ok(Self {
            channels,
            source: None,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut snapshot =
            Self::from_json(&content).map_err(|e| Error::snapshot(path, e.to_string()))?;
        snapshot.source = Some(path.to_path_buf());
        tracing::debug!(
            "loaded {} channels from {}",
            snapshot.channels.len(),
            path.display()
        );
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Position of the channel with `id`, if present.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.id == id)
    }

    pub fn totals(&self) -> SnapshotTotals {
        let mut t = SnapshotTotals::default();
        for c in &self.channels {
            t.channels += 1;
            if c.is_active {
                t.active += 1;
            }
            t.capacity = t.capacity.saturating_add(c.capacity);
            t.local_balance = t.local_balance.saturating_add(c.local_balance);
            t.remote_balance = t.remote_balance.saturating_add(c.remote_balance);
        }
        t
    }
}

/// Aggregates for the header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotTotals {
    pub channels: usize,
    pub active: usize,
    pub capacity: u64,
    pub local_balance: u64,
    pub remote_balance: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_CHANNEL: &str = r##"{
        "id": "812345x1234x1",
        "capacity": 1000000,
        "local_balance": 700000,
        "remote_balance": 290000,
        "is_active": true,
        "is_private": true,
        "transaction_id": "ab12",
        "transaction_vout": 1,
        "partner_public_key": "02aa",
        "partner_node_info": {
            "alias": "ACINQ",
            "capacity": 5000000000,
            "channel_count": 2000,
            "color": "#3399ff",
            "updated_at": "2024-03-01T12:00:00Z"
        }
    }"##;

    #[test]
    fn test_parse_wrapped_and_bare() {
        let wrapped = format!("{{\"channels\": [{ONE_CHANNEL}]}}");
        let bare = format!("[{ONE_CHANNEL}]");
        let a = ChannelSnapshot::from_json(&wrapped).unwrap();
        let b = ChannelSnapshot::from_json(&bare).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        let c = &a.channels[0];
        assert_eq!(c.display_alias(), "ACINQ");
        assert_eq!(c.transaction_vout, 1);
        assert!(c.is_private);
        assert!(!c.is_closing);
        assert_eq!(c.partner().rgb(), Some((0x33, 0x99, 0xff)));
    }

    #[test]
    fn test_missing_partner_info_falls_back() {
        let snap = ChannelSnapshot::from_json(r#"[{"id": "1x1x1", "partner_node_info": null}]"#)
            .unwrap();
        let c = &snap.channels[0];
        assert_eq!(c.display_alias(), UNKNOWN_ALIAS);
        assert_eq!(c.partner().capacity, None);
        assert_eq!(c.capacity, 0);
        assert_eq!(c.time_online, None);
    }

    #[test]
    fn test_blank_alias_is_unknown() {
        let snap =
            ChannelSnapshot::from_json(r#"[{"partner_node_info": {"alias": "   "}}]"#).unwrap();
        assert_eq!(snap.channels[0].display_alias(), UNKNOWN_ALIAS);
    }

    #[test]
    fn test_bad_color_is_ignored() {
        let info = PartnerNodeInfo {
            color: Some("#12345".into()),
            ..Default::default()
        };
        assert_eq!(info.rgb(), None);
        let info = PartnerNodeInfo {
            color: Some("zzzzzz".into()),
            ..Default::default()
        };
        assert_eq!(info.rgb(), None);
    }

    #[test]
    fn test_totals_and_position() {
        let snap = ChannelSnapshot::from_json(
            r#"[
                {"id": "a", "capacity": 10, "local_balance": 6, "remote_balance": 4, "is_active": true},
                {"id": "b", "capacity": 20, "local_balance": 5, "remote_balance": 15}
            ]"#,
        )
        .unwrap();
        let t = snap.totals();
        assert_eq!(t.channels, 2);
        assert_eq!(t.active, 1);
        assert_eq!(t.capacity, 30);
        assert_eq!(t.local_balance, 11);
        assert_eq!(t.remote_balance, 19);
        assert_eq!(snap.position_of("b"), Some(1));
        assert_eq!(snap.position_of("zz"), None);
    }

    #[test]
    fn test_search_text_covers_alias_key_and_id() {
        let snap = ChannelSnapshot::from_json(&format!("[{ONE_CHANNEL}]")).unwrap();
        let text = snap.channels[0].search_text();
        assert!(text.contains("acinq"));
        assert!(text.contains("02aa"));
        assert!(text.contains("812345x1234x1"));
    }
}
