// Safety domain models - alerts, risk levels and the scan result.
//
// These are pure domain types with no HTTP or database dependencies.
// The web layer serializes them as-is; the SQLite store maps them to rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters of the flagged text kept on an alert.
pub const ALERT_CONTENT_LIMIT: usize = 500;

/// Characters shown in a moderator card before the preview is cut.
pub const ALERT_PREVIEW_LIMIT: usize = 200;

/// Which kind of user content triggered a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    /// A new forum topic
    Topic,
    /// A reply on a forum topic
    Reply,
    /// A private (direct) message
    Private,
}

/// Dutch label and admin link prefix per content type.
static CONTENT_TYPE_TABLE: [(ContentType, &str, &str); 3] = [
    (ContentType::Topic, "Topic", "/community/topic/"),
    (ContentType::Reply, "Reactie", "/community"),
    (ContentType::Private, "Privébericht", "/admin/alerts"),
];

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Topic => "TOPIC",
            ContentType::Reply => "REPLY",
            ContentType::Private => "PRIVATE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TOPIC" => Some(ContentType::Topic),
            "REPLY" => Some(ContentType::Reply),
            "PRIVATE" => Some(ContentType::Private),
            _ => None,
        }
    }

    fn table_row(&self) -> &'static (ContentType, &'static str, &'static str) {
        // The table covers every variant, so the fallback row is never hit.
        CONTENT_TYPE_TABLE
            .iter()
            .find(|(kind, _, _)| kind == self)
            .unwrap_or(&CONTENT_TYPE_TABLE[0])
    }

    /// Label shown on the moderator dashboard.
    pub fn label(&self) -> &'static str {
        self.table_row().1
    }

    /// Where a moderator can look at the flagged content.
    ///
    /// Only topics can be linked directly; replies and private messages point
    /// at an overview page.
    pub fn link_for(&self, ref_id: &str) -> String {
        match self {
            ContentType::Topic => format!("{}{}", self.table_row().2, ref_id),
            _ => self.table_row().2.to_string(),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered severity of a scan. `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

static RISK_BADGE_TABLE: [(RiskLevel, &str); 3] = [
    (RiskLevel::Low, "risk-low"),
    (RiskLevel::Medium, "risk-medium"),
    (RiskLevel::High, "risk-high"),
];

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }

    /// CSS class of the risk badge on the moderator dashboard.
    pub fn badge_class(&self) -> &'static str {
        RISK_BADGE_TABLE
            .iter()
            .find(|(level, _)| level == self)
            .map(|(_, class)| *class)
            .unwrap_or("risk-low")
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of scanning a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub risk_level: RiskLevel,
    /// Fixed rationale string tied to the risk level
    pub reason: String,
    /// Every keyword of the winning tier found in the text, in vocabulary order
    pub matched_keywords: Vec<String>,
}

impl ScanResult {
    /// Only MEDIUM and HIGH results are alert-worthy.
    pub fn requires_alert(&self) -> bool {
        self.risk_level >= RiskLevel::Medium
    }

    /// True when at least one keyword matched.
    ///
    /// A LOW result with a signal came from the LOW vocabulary; a LOW result
    /// without one means nothing was found at all.
    pub fn has_signal(&self) -> bool {
        !self.matched_keywords.is_empty()
    }
}

/// Moderator action closing an alert.
///
/// `resolved_at` and `resolved_by` only exist together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub resolved_at: DateTime<Utc>,
    pub resolved_by: String,
    pub notes: Option<String>,
}

/// Payload for persisting a new alert. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub content_type: ContentType,
    pub ref_id: String,
    pub risk_level: RiskLevel,
    pub reason: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewAlert {
    /// Build an alert payload from a scan, keeping only a bounded preview of the text.
    pub fn from_scan(
        content_type: ContentType,
        ref_id: &str,
        scan: &ScanResult,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content_type,
            ref_id: ref_id.to_string(),
            risk_level: scan.risk_level,
            reason: scan.reason.clone(),
            content: truncate_chars(text, ALERT_CONTENT_LIMIT),
            created_at,
        }
    }

    pub fn into_alert(self, id: String) -> Alert {
        Alert {
            id,
            content_type: self.content_type,
            ref_id: self.ref_id,
            risk_level: self.risk_level,
            reason: self.reason,
            content: self.content,
            created_at: self.created_at,
            resolution: None,
        }
    }
}

/// Lifecycle state of an alert, derived from its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertState {
    Open,
    Resolved,
}

/// A persisted record flagging content for moderator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub ref_id: String,
    pub risk_level: RiskLevel,
    pub reason: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten, with = "flat_resolution")]
    pub resolution: Option<Resolution>,
}

impl Alert {
    pub fn state(&self) -> AlertState {
        if self.resolution.is_some() {
            AlertState::Resolved
        } else {
            AlertState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.resolution.is_none()
    }

    /// Short quote of the flagged content for the moderator card.
    pub fn preview(&self) -> String {
        let mut preview = truncate_chars(&self.content, ALERT_PREVIEW_LIMIT);
        if self.content.chars().count() > ALERT_PREVIEW_LIMIT {
            preview.push_str("...");
        }
        preview
    }
}

/// Counters for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AlertStats {
    pub pending: u64,
    pub resolved: u64,
    pub total: u64,
}

/// Take at most `limit` characters (not bytes) from `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

// Serializes `Option<Resolution>` as nullable `resolvedAt` / `resolvedBy` / `notes`
// fields on the alert itself, so open alerts carry explicit nulls.
mod flat_resolution {
    use super::Resolution;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Flat {
        resolved_at: Option<DateTime<Utc>>,
        resolved_by: Option<String>,
        notes: Option<String>,
    }

    pub fn serialize<S: Serializer>(
        value: &Option<Resolution>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let flat = match value {
            Some(r) => Flat {
                resolved_at: Some(r.resolved_at),
                resolved_by: Some(r.resolved_by.clone()),
                notes: r.notes.clone(),
            },
            None => Flat {
                resolved_at: None,
                resolved_by: None,
                notes: None,
            },
        };
        flat.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Resolution>, D::Error> {
        let flat = Flat::deserialize(deserializer)?;
        Ok(match (flat.resolved_at, flat.resolved_by) {
            (Some(resolved_at), Some(resolved_by)) => Some(Resolution {
                resolved_at,
                resolved_by,
                notes: flat.notes,
            }),
            _ => None,
        })
    }
}
