//! Card view-model: turns a `ChannelRecord` into what a card shows.
//!
//! Nothing here touches the terminal. The card renderer maps these values to
//! spans, which keeps the shaping rules testable on their own.

use chrono::{DateTime, Utc};

use chan_proto::channel::ChannelRecord;
use chan_proto::format::{self, Links, Price, MISSING};
use chan_proto::ratio;

/// Who may trigger privileged actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    #[default]
    Viewer,
    Admin,
}

impl Capability {
    pub fn from_admin(admin: bool) -> Self {
        if admin {
            Self::Admin
        } else {
            Self::Viewer
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Build the gated content for admins, nothing for everyone else.
    pub fn gate<T>(self, content: impl FnOnce() -> T) -> Option<T> {
        match self {
            Self::Admin => Some(content()),
            Self::Viewer => None,
        }
    }
}

/// Formatting collaborators bundled for one render pass.
#[derive(Debug, Clone)]
pub struct DisplayContext {
    pub price: Price,
    pub links: Links,
    pub date_format: String,
    pub now: DateTime<Utc>,
}

impl DisplayContext {
    pub fn from_config(config: &chan_proto::config::Config) -> Self {
        Self {
            price: config.price(),
            links: config.links(),
            date_format: config.display.date_format.clone(),
            now: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Active,
    Opening,
    Closing,
}

impl StatusKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Opening => "opening",
            Self::Closing => "closing",
        }
    }
}

/// One status indicator. The three dots are independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDot {
    pub kind: StatusKind,
    pub on: bool,
}

/// Which side opened the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiator {
    Partner,
    Local,
}

impl Initiator {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Partner => "↑",
            Self::Local => "↓",
        }
    }
}

/// Marker for private (unannounced) channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivacyIcon;

impl PrivacyIcon {
    pub const GLYPH: &'static str = "⊘";
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub alias: String,
    pub capacity: String,
    pub dots: [StatusDot; 3],
    pub initiator: Initiator,
    pub privacy: Option<PrivacyIcon>,
    /// Local share of local + remote, `0..=100`.
    pub balance_pct: f64,
    /// Received share of received + sent, `0..=100`.
    pub activity_pct: f64,
    pub accent: Option<(u8, u8, u8)>,
}

/// Hover text of the two bars, shown under the cursor card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarHints {
    pub balance: String,
    pub activity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledLine {
    pub label: &'static str,
    pub value: String,
    /// Explorer URL shown after the value.
    pub link: Option<String>,
}

impl LabeledLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            link: None,
        }
    }

    fn linked(label: &'static str, value: impl Into<String>, link: Option<String>) -> Self {
        Self {
            label,
            value: value.into(),
            link,
        }
    }
}

/// The admin-only "Close Channel" button and what it passes to the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseAction {
    pub channel_id: String,
    pub channel_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsPanel {
    pub lines: Vec<LabeledLine>,
    pub partner_lines: Vec<LabeledLine>,
    pub close_action: Option<CloseAction>,
}

impl DetailsPanel {
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .chain(self.partner_lines.iter())
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }
}

pub fn summarize(record: &ChannelRecord, ctx: &DisplayContext) -> CardSummary {
    CardSummary {
        alias: record.display_alias().to_string(),
        capacity: ctx.price.format(record.capacity),
        dots: [
            StatusDot {
                kind: StatusKind::Active,
                on: record.is_active,
            },
            StatusDot {
                kind: StatusKind::Opening,
                on: record.is_opening,
            },
            StatusDot {
                kind: StatusKind::Closing,
                on: record.is_closing,
            },
        ],
        initiator: if record.is_partner_initiated {
            Initiator::Partner
        } else {
            Initiator::Local
        },
        privacy: record.is_private.then_some(PrivacyIcon),
        balance_pct: ratio::percent(record.local_balance, record.remote_balance),
        activity_pct: ratio::percent(record.received, record.sent),
        accent: record.partner().rgb(),
    }
}

pub fn bar_hints(record: &ChannelRecord, ctx: &DisplayContext) -> BarHints {
    BarHints {
        balance: format!(
            "local {} / remote {}",
            ctx.price.format(record.local_balance),
            ctx.price.format(record.remote_balance)
        ),
        activity: format!(
            "received {} / sent {}",
            ctx.price.format(record.received),
            ctx.price.format(record.sent)
        ),
    }
}

pub fn details(record: &ChannelRecord, ctx: &DisplayContext, cap: Capability) -> DetailsPanel {
    let price = |amount: u64| ctx.price.format(amount);
    let partner = record.partner();

    let lines = vec![
        LabeledLine::new(
            "Balancedness",
            format!(
                "{:.2}",
                ratio::balancedness(record.local_balance, record.remote_balance)
            ),
        ),
        LabeledLine::new("Local Balance", price(record.local_balance)),
        LabeledLine::new("Remote Balance", price(record.remote_balance)),
        LabeledLine::new("Received", price(record.received)),
        LabeledLine::new("Sent", price(record.sent)),
        LabeledLine::linked(
            "Node Public Key",
            or_missing(&record.partner_public_key),
            ctx.links.node(&record.partner_public_key),
        ),
        LabeledLine::linked(
            "Transaction Id",
            or_missing(&record.transaction_id),
            ctx.links.transaction(&record.transaction_id),
        ),
        LabeledLine::new("Channel Id", or_missing(&record.id)),
        LabeledLine::new("Commit Fee", price(record.commit_transaction_fee)),
        LabeledLine::new(
            "Commit Weight",
            format!(
                "{} WU",
                format::group_thousands(record.commit_transaction_weight as u128)
            ),
        ),
        LabeledLine::new("Is Static Remote Key", yes_no(record.is_static_remote_key)),
        LabeledLine::new("Local Reserve", price(record.local_reserve)),
        LabeledLine::new("Remote Reserve", price(record.remote_reserve)),
        LabeledLine::new(
            "Time Offline",
            format::format_optional_duration(record.time_offline),
        ),
        LabeledLine::new(
            "Time Online",
            format::format_optional_duration(record.time_online),
        ),
        LabeledLine::new("Transaction Vout", record.transaction_vout.to_string()),
        LabeledLine::new("Unsettled Balance", price(record.unsettled_balance)),
    ];

    let partner_lines = vec![
        LabeledLine::new(
            "Node Capacity",
            partner
                .capacity
                .map(price)
                .unwrap_or_else(|| MISSING.to_string()),
        ),
        LabeledLine::new(
            "Channel Count",
            partner
                .channel_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        ),
        LabeledLine::new(
            "Last Update",
            format::last_update(partner.updated_at, ctx.now, &ctx.date_format),
        ),
    ];

    let close_action = cap.gate(|| CloseAction {
        channel_id: record.id.clone(),
        channel_name: record.display_alias().to_string(),
    });

    DetailsPanel {
        lines,
        partner_lines,
        close_action,
    }
}

fn or_missing(s: &str) -> String {
    if s.trim().is_empty() {
        MISSING.to_string()
    } else {
        s.to_string()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chan_proto::channel::PartnerNodeInfo;
    use chan_proto::format::{Currency, DEFAULT_DATE_FORMAT};
    use chrono::TimeZone;

    pub(crate) fn ctx() -> DisplayContext {
        DisplayContext {
            price: Price::new(Currency::Sat),
            links: Links::new("https://mempool.space/tx", "https://1ml.com/node"),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    pub(crate) fn record(id: &str, alias: Option<&str>) -> ChannelRecord {
        ChannelRecord {
            id: id.to_string(),
            capacity: 1_000_000,
            local_balance: 700_000,
            remote_balance: 300_000,
            received: 20,
            sent: 80,
            transaction_id: format!("tx-{id}"),
            partner_public_key: format!("02{id}"),
            partner_node_info: Some(PartnerNodeInfo {
                alias: alias.map(str::to_string),
                capacity: Some(5_000_000),
                channel_count: Some(42),
                color: Some("#ff8800".into()),
                updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 30, 12, 0, 0).unwrap()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_bars_and_capacity() {
        let s = summarize(&record("a", Some("ACINQ")), &ctx());
        assert_eq!(s.alias, "ACINQ");
        assert_eq!(s.capacity, "1,000,000 sats");
        assert_eq!(s.balance_pct, 70.0);
        assert_eq!(s.activity_pct, 20.0);
        assert_eq!(s.accent, Some((0xff, 0x88, 0x00)));
    }

    #[test]
    fn test_status_dots_are_independent() {
        let mut r = record("a", None);
        r.is_active = true;
        r.is_opening = true;
        r.is_closing = true;
        let s = summarize(&r, &ctx());
        assert!(s.dots.iter().all(|d| d.on));

        let s = summarize(&record("a", None), &ctx());
        assert!(s.dots.iter().all(|d| !d.on));
        let kinds: Vec<_> = s.dots.iter().map(|d| d.kind.label()).collect();
        assert_eq!(kinds, ["active", "opening", "closing"]);
    }

    #[test]
    fn test_privacy_icon_only_when_private() {
        let mut r = record("a", None);
        r.is_private = true;
        assert_eq!(summarize(&r, &ctx()).privacy, Some(PrivacyIcon));
        r.is_private = false;
        assert_eq!(summarize(&r, &ctx()).privacy, None);
    }

    #[test]
    fn test_initiator_icon() {
        let mut r = record("a", None);
        r.is_partner_initiated = true;
        assert_eq!(summarize(&r, &ctx()).initiator, Initiator::Partner);
        r.is_partner_initiated = false;
        assert_eq!(summarize(&r, &ctx()).initiator.icon(), "↓");
    }

    #[test]
    fn test_admin_gate() {
        assert_eq!(Capability::Viewer.gate(|| 1), None);
        assert_eq!(Capability::Admin.gate(|| 1), Some(1));

        let r = record("chan-9", Some("Bob"));
        assert!(details(&r, &ctx(), Capability::Viewer).close_action.is_none());
        assert_eq!(
            details(&r, &ctx(), Capability::Admin).close_action,
            Some(CloseAction {
                channel_id: "chan-9".into(),
                channel_name: "Bob".into(),
            })
        );
    }

    #[test]
    fn test_details_lines() {
        let panel = details(&record("a", Some("ACINQ")), &ctx(), Capability::Viewer);
        let labels: Vec<_> = panel.lines.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            [
                "Balancedness",
                "Local Balance",
                "Remote Balance",
                "Received",
                "Sent",
                "Node Public Key",
                "Transaction Id",
                "Channel Id",
                "Commit Fee",
                "Commit Weight",
                "Is Static Remote Key",
                "Local Reserve",
                "Remote Reserve",
                "Time Offline",
                "Time Online",
                "Transaction Vout",
                "Unsettled Balance",
            ]
        );
        assert_eq!(panel.value_of("Balancedness"), Some("0.70"));
        assert_eq!(panel.value_of("Is Static Remote Key"), Some("no"));
        assert_eq!(panel.value_of("Time Online"), Some(MISSING));
        assert_eq!(panel.value_of("Channel Count"), Some("42"));
        assert_eq!(
            panel.value_of("Last Update"),
            Some("2 days ago (30/05/2024 12:00)")
        );
        let tx = panel
            .lines
            .iter()
            .find(|l| l.label == "Transaction Id")
            .unwrap();
        assert_eq!(tx.link.as_deref(), Some("https://mempool.space/tx/tx-a"));
    }

    #[test]
    fn test_details_with_malformed_date_format() {
        let mut ctx = ctx();
        ctx.date_format = "%Y-%".to_string();
        let panel = details(&record("a", Some("ACINQ")), &ctx, Capability::Viewer);
        assert_eq!(
            panel.value_of("Last Update"),
            Some("2 days ago (30/05/2024 12:00)")
        );
    }

    #[test]
    fn test_details_without_partner_info() {
        let mut r = record("a", None);
        r.partner_node_info = None;
        r.transaction_id.clear();
        let panel = details(&r, &ctx(), Capability::Admin);
        assert_eq!(panel.value_of("Node Capacity"), Some(MISSING));
        assert_eq!(panel.value_of("Last Update"), Some(MISSING));
        assert_eq!(panel.value_of("Transaction Id"), Some(MISSING));
        assert_eq!(
            panel.close_action.map(|a| a.channel_name),
            Some("Unknown".to_string())
        );
    }

    #[test]
    fn test_bar_hints() {
        let hints = bar_hints(&record("a", None), &ctx());
        assert_eq!(hints.balance, "local 700,000 sats / remote 300,000 sats");
        assert_eq!(hints.activity, "received 20 sats / sent 80 sats");
    }
}
