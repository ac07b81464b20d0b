//! Structured inspection failure reasons.
//!
//! A failure reason is a set of canonical reason tags plus an optional
//! free-text remark. Historically the whole value was stored as one delimited
//! string (`"Brakes, Oil Leak, Other: cracked mirror"`); the codec here keeps
//! reading and writing that encoding so existing rows stay compatible, while
//! the rest of the crate works with the structured form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Canonical failure reasons seeded for every installation. Administrators
/// may extend the list at runtime; these names are also used to recognise
/// structured legacy strings.
pub const CANONICAL_FAILURE_REASONS: [&str; 13] = [
    "Expired TUV/Certification",
    "Brakes",
    "Lights & Signals",
    "Tires & Wheels",
    "Steering",
    "Oil Leak",
    "Engine Issues",
    "Body Damage",
    "Safety Equipment Missing",
    "Electrical Issues",
    "Exhaust & Emissions",
    "Seatbelts",
    "Documentation Issues",
];

const OTHER_PREFIX: &str = "Other:";

/// An administrator-maintained failure reason entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureReasonEntry {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Why an inspection failed: canonical tags plus an optional remark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureReason {
    /// Selected canonical reason names, in selection order.
    pub tags: Vec<String>,
    /// Free-text remark for anything the canonical list does not cover.
    pub remark: Option<String>,
}

impl FailureReason {
    /// A reason with no content.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from selected tags and an optional remark, dropping blanks.
    pub fn new(tags: Vec<String>, remark: Option<String>) -> Self {
        let tags = tags
            .into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect();
        let remark = remark
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty());
        Self { tags, remark }
    }

    /// Whether the reason carries no information at all.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.remark.is_none()
    }

    /// Encode into the legacy delimited string, or `None` when empty.
    ///
    /// # Examples
    /// ```
    /// use fleetgate::domain::FailureReason;
    ///
    /// let reason = FailureReason::new(
    ///     vec!["Brakes".into(), "Oil Leak".into()],
    ///     Some("cracked mirror".into()),
    /// );
    /// assert_eq!(
    ///     reason.to_legacy_string(),
    ///     Some("Brakes, Oil Leak, Other: cracked mirror".into())
    /// );
    /// ```
    pub fn to_legacy_string(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut parts: Vec<String> = self.tags.clone();
        if let Some(remark) = &self.remark {
            parts.push(format!("{OTHER_PREFIX} {remark}"));
        }
        Some(parts.join(", "))
    }

    /// Decode the legacy delimited string.
    ///
    /// Structured strings split into tags and a trailing `Other:` remark. A
    /// value that carries neither a canonical tag nor an `Other:` marker is
    /// treated as opaque free text and preserved verbatim as the remark, so
    /// pre-structured rows survive a round trip.
    pub fn parse_legacy(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::empty();
        };

        let (head, remark) = match value.split_once(OTHER_PREFIX) {
            Some((head, rest)) => (head, Some(rest.trim().to_owned())),
            None => (value, None),
        };
        let tags: Vec<String> = head
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        let structured =
            remark.is_some() || tags.iter().any(|t| CANONICAL_FAILURE_REASONS.contains(&t.as_str()));
        if !structured {
            return Self {
                tags: Vec::new(),
                remark: Some(value.to_owned()),
            };
        }
        Self {
            tags,
            remark: remark.filter(|r| !r.is_empty()),
        }
    }
}
