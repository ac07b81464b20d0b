//! Vehicle/equipment entity, plate validation, and status display rules.
//!
//! Two read-time rules sit on top of the stored status:
//!
//! - the `blacklisted` flag is an override that always wins visually and
//!   logically over the stored status, and
//! - a vehicle stored as `verified` whose next inspection date has passed is
//!   displayed as `inspection_overdue` until the periodic batch job persists
//!   that transition. The stored status stays authoritative.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stored vehicle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Verified,
    UpdatedInspectionRequired,
    InspectionOverdue,
    Rejected,
    Blacklisted,
}

/// All vehicle statuses, in a stable order.
pub const ALL_VEHICLE_STATUSES: [VehicleStatus; 5] = [
    VehicleStatus::Verified,
    VehicleStatus::UpdatedInspectionRequired,
    VehicleStatus::InspectionOverdue,
    VehicleStatus::Rejected,
    VehicleStatus::Blacklisted,
];

impl VehicleStatus {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::UpdatedInspectionRequired => "updated_inspection_required",
            Self::InspectionOverdue => "inspection_overdue",
            Self::Rejected => "rejected",
            Self::Blacklisted => "blacklisted",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "verified" => Ok(Self::Verified),
            "updated_inspection_required" => Ok(Self::UpdatedInspectionRequired),
            "inspection_overdue" => Ok(Self::InspectionOverdue),
            "rejected" => Ok(Self::Rejected),
            "blacklisted" => Ok(Self::Blacklisted),
            other => Err(format!("unknown vehicle status: {other}")),
        }
    }
}

/// Validation errors raised by [`PlateNumber::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlateValidationError {
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
}

impl fmt::Display for PlateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "plate number is required"),
            Self::TooShort { min } => {
                write!(f, "plate number must be at least {min} characters")
            }
            Self::TooLong { max } => {
                write!(f, "plate number must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PlateValidationError {}

/// Minimum plate length after cleaning.
pub const PLATE_MIN: usize = 4;
/// Maximum plate length after cleaning.
pub const PLATE_MAX: usize = 17;

/// Validated, normalised plate number.
///
/// Construction folds Arabic-Indic numerals to ASCII digits, drops spaces,
/// dashes, and any other non-alphanumeric character, and uppercases the rest,
/// so `"ب 1234"` entered at the gate and `"B1234"` from a spreadsheet import
/// compare equal when they refer to the same plate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlateNumber(String);

fn fold_digit(c: char) -> char {
    match c {
        // Arabic-Indic and Extended Arabic-Indic numerals.
        '\u{0660}'..='\u{0669}' => {
            char::from_digit(c as u32 - 0x0660, 10).unwrap_or(c)
        }
        '\u{06F0}'..='\u{06F9}' => {
            char::from_digit(c as u32 - 0x06F0, 10).unwrap_or(c)
        }
        _ => c,
    }
}

impl PlateNumber {
    /// Clean and validate a raw plate entry.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PlateValidationError> {
        let cleaned: String = raw
            .as_ref()
            .chars()
            .map(fold_digit)
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if cleaned.is_empty() {
            return Err(PlateValidationError::Empty);
        }
        let length = cleaned.chars().count();
        if length < PLATE_MIN {
            return Err(PlateValidationError::TooShort { min: PLATE_MIN });
        }
        if length > PLATE_MAX {
            return Err(PlateValidationError::TooLong { max: PLATE_MAX });
        }
        Ok(Self(cleaned))
    }
}

impl AsRef<str> for PlateNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PlateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PlateNumber> for String {
    fn from(value: PlateNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for PlateNumber {
    type Error = PlateValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A vehicle or piece of heavy equipment registered at the gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub plate_number: PlateNumber,
    pub driver_name: Option<String>,
    pub national_id: Option<String>,
    pub company_id: Option<Uuid>,
    pub equipment_type_id: Option<Uuid>,
    pub year_of_manufacture: Option<i32>,
    pub project: Option<String>,
    pub gate: Option<String>,
    pub status: VehicleStatus,
    pub next_inspection_date: Option<NaiveDate>,
    pub blacklisted: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Status to show for this vehicle as of `today`.
    ///
    /// The blacklist flag overrides everything; a verified vehicle whose next
    /// inspection date has elapsed displays as overdue while the stored
    /// status remains `verified` until the batch job catches up.
    pub fn display_status(&self, today: NaiveDate) -> VehicleStatus {
        if self.blacklisted {
            return VehicleStatus::Blacklisted;
        }
        if self.status == VehicleStatus::Verified {
            if let Some(due) = self.next_inspection_date {
                if due < today {
                    return VehicleStatus::InspectionOverdue;
                }
            }
        }
        self.status
    }
}
