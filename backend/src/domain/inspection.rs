//! Inspection entity, checklist items, and their enums.
//!
//! Inspections are never hard-deleted; a cancelled inspection stays on record
//! with `status = cancelled`. Verification happens at most once and only on a
//! completed inspection; the write path enforces that with a conditional
//! update keyed on `verified_at` still being absent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::failure_reason::FailureReason;

/// Why the inspection takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InspectionType {
    Routine,
    FollowUp,
    ReInspection,
}

impl InspectionType {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::FollowUp => "follow_up",
            Self::ReInspection => "re_inspection",
        }
    }
}

impl FromStr for InspectionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "routine" => Ok(Self::Routine),
            "follow_up" => Ok(Self::FollowUp),
            "re_inspection" => Ok(Self::ReInspection),
            other => Err(format!("unknown inspection type: {other}")),
        }
    }
}

/// Result recorded when an inspection is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InspectionResult {
    Pass,
    Fail,
    Pending,
}

impl InspectionResult {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for InspectionResult {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            "pending" => Ok(Self::Pending),
            other => Err(format!("unknown inspection result: {other}")),
        }
    }
}

/// Where the inspection sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspectionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown inspection status: {other}")),
        }
    }
}

/// A single inspection of a vehicle.
///
/// ## Invariants
/// - `result == Fail` implies a non-empty `failure_reason` once completed.
/// - `verified_at` is only ever set while `status == Completed`, at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub inspection_type: InspectionType,
    pub assignment_id: Option<Uuid>,
    pub assigned_inspector_id: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: InspectionResult,
    pub failure_reason: FailureReason,
    pub notes: Option<String>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub status: InspectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inspection {
    /// Whether a verifier has signed off on this inspection.
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Whether the inspection can still receive a submission.
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            InspectionStatus::Scheduled | InspectionStatus::InProgress
        )
    }
}

/// One checklist line recorded with a submission. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub item_name: String,
    pub item_description: Option<String>,
    pub passed: Option<bool>,
    pub notes: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
}
