//! Assignment entity: a company booked for inspection on a date.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Where an assignment sits in its lifecycle.
///
/// `Done` is terminal; the other states remain editable. `Rescheduled` is
/// only ever entered as a side effect of moving the scheduled date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    Rescheduled,
    Done,
    Delayed,
}

impl AssignmentStatus {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Rescheduled => "rescheduled",
            Self::Done => "done",
            Self::Delayed => "delayed",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "assigned" => Ok(Self::Assigned),
            "rescheduled" => Ok(Self::Rescheduled),
            "done" => Ok(Self::Done),
            "delayed" => Ok(Self::Delayed),
            other => Err(format!("unknown assignment status: {other}")),
        }
    }
}

/// An inspection booking for a company, optionally with a named inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub company_id: Uuid,
    pub inspector_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// Whether the assignment may still be edited or transitioned.
    pub fn is_editable(&self) -> bool {
        self.status != AssignmentStatus::Done
    }
}
