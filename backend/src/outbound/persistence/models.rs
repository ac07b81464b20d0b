//! Database row models and their conversions to domain entities.
//!
//! Rows carry enum columns as strings; conversion to a domain entity parses
//! them and fails loudly (a `Query` port error) rather than guessing, since
//! an unknown status in storage means the schema and the code disagree.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::failure_reason::FailureReason;
use crate::domain::{
    Assignment, AuditEntry, ChecklistItem, FailureReasonEntry, Inspection, PlateNumber,
    UserProfile, Vehicle,
};

use super::schema::{
    assignments, audit_logs, failure_reasons, inspection_checklist_items, inspections,
    user_profiles, vehicle_equipment,
};

/// Error raised when a stored row cannot be converted to a domain entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stored value in {column}: {message}")]
pub struct RowConversionError {
    pub column: &'static str,
    pub message: String,
}

impl RowConversionError {
    fn new(column: &'static str, message: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = user_profiles)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserProfile> for UserProfileRow {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            role: profile.role.as_str().to_owned(),
            phone: profile.phone.clone(),
            is_active: profile.is_active,
            company_id: profile.company_id,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

impl TryFrom<UserProfileRow> for UserProfile {
    type Error = RowConversionError;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: row
                .role
                .parse()
                .map_err(|e: crate::domain::ParseRoleError| {
                    RowConversionError::new("role", e.to_string())
                })?,
            phone: row.phone,
            is_active: row.is_active,
            company_id: row.company_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = vehicle_equipment)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VehicleRow {
    pub id: Uuid,
    pub plate_number: String,
    pub driver_name: Option<String>,
    pub national_id: Option<String>,
    pub company_id: Option<Uuid>,
    pub equipment_type_id: Option<Uuid>,
    pub year_of_manufacture: Option<i32>,
    pub project: Option<String>,
    pub gate: Option<String>,
    pub status: String,
    pub next_inspection_date: Option<NaiveDate>,
    pub blacklisted: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Vehicle> for VehicleRow {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate_number: vehicle.plate_number.as_ref().to_owned(),
            driver_name: vehicle.driver_name.clone(),
            national_id: vehicle.national_id.clone(),
            company_id: vehicle.company_id,
            equipment_type_id: vehicle.equipment_type_id,
            year_of_manufacture: vehicle.year_of_manufacture,
            project: vehicle.project.clone(),
            gate: vehicle.gate.clone(),
            status: vehicle.status.as_str().to_owned(),
            next_inspection_date: vehicle.next_inspection_date,
            blacklisted: vehicle.blacklisted,
            created_by: vehicle.created_by,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = RowConversionError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            plate_number: PlateNumber::new(&row.plate_number)
                .map_err(|e| RowConversionError::new("plate_number", e.to_string()))?,
            driver_name: row.driver_name,
            national_id: row.national_id,
            company_id: row.company_id,
            equipment_type_id: row.equipment_type_id,
            year_of_manufacture: row.year_of_manufacture,
            project: row.project,
            gate: row.gate,
            status: row
                .status
                .parse()
                .map_err(|e: String| RowConversionError::new("status", e))?,
            next_inspection_date: row.next_inspection_date,
            blacklisted: row.blacklisted,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = inspections)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InspectionRow {
    pub id: Uuid,
    pub vehicle_equipment_id: Uuid,
    pub inspection_type: String,
    pub assignment_id: Option<Uuid>,
    pub assigned_inspector_id: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: String,
    pub failure_reason: Option<String>,
    pub notes: Option<String>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Inspection> for InspectionRow {
    fn from(inspection: &Inspection) -> Self {
        Self {
            id: inspection.id,
            vehicle_equipment_id: inspection.vehicle_id,
            inspection_type: inspection.inspection_type.as_str().to_owned(),
            assignment_id: inspection.assignment_id,
            assigned_inspector_id: inspection.assigned_inspector_id,
            assigned_by: inspection.assigned_by,
            scheduled_date: inspection.scheduled_date,
            started_at: inspection.started_at,
            completed_at: inspection.completed_at,
            result: inspection.result.as_str().to_owned(),
            // Stored in the historical delimited encoding for compatibility
            // with rows written before the structured model existed.
            failure_reason: inspection.failure_reason.to_legacy_string(),
            notes: inspection.notes.clone(),
            verified_by: inspection.verified_by,
            verified_at: inspection.verified_at,
            status: inspection.status.as_str().to_owned(),
            created_at: inspection.created_at,
            updated_at: inspection.updated_at,
        }
    }
}

impl TryFrom<InspectionRow> for Inspection {
    type Error = RowConversionError;

    fn try_from(row: InspectionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            vehicle_id: row.vehicle_equipment_id,
            inspection_type: row
                .inspection_type
                .parse()
                .map_err(|e: String| RowConversionError::new("inspection_type", e))?,
            assignment_id: row.assignment_id,
            assigned_inspector_id: row.assigned_inspector_id,
            assigned_by: row.assigned_by,
            scheduled_date: row.scheduled_date,
            started_at: row.started_at,
            completed_at: row.completed_at,
            result: row
                .result
                .parse()
                .map_err(|e: String| RowConversionError::new("result", e))?,
            failure_reason: FailureReason::parse_legacy(row.failure_reason.as_deref()),
            notes: row.notes,
            verified_by: row.verified_by,
            verified_at: row.verified_at,
            status: row
                .status
                .parse()
                .map_err(|e: String| RowConversionError::new("status", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = inspection_checklist_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChecklistItemRow {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub item_name: String,
    pub item_description: Option<String>,
    pub passed: Option<bool>,
    pub notes: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
}

impl From<&ChecklistItem> for ChecklistItemRow {
    fn from(item: &ChecklistItem) -> Self {
        Self {
            id: item.id,
            inspection_id: item.inspection_id,
            item_name: item.item_name.clone(),
            item_description: item.item_description.clone(),
            passed: item.passed,
            notes: item.notes.clone(),
            checked_at: item.checked_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = assignments)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub inspector_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Assignment> for AssignmentRow {
    fn from(assignment: &Assignment) -> Self {
        Self {
            id: assignment.id,
            company_id: assignment.company_id,
            inspector_id: assignment.inspector_id,
            scheduled_date: assignment.scheduled_date,
            status: assignment.status.as_str().to_owned(),
            notes: assignment.notes.clone(),
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        }
    }
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = RowConversionError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            company_id: row.company_id,
            inspector_id: row.inspector_id,
            scheduled_date: row.scheduled_date,
            status: row
                .status
                .parse()
                .map_err(|e: String| RowConversionError::new("status", e))?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = failure_reasons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FailureReasonRow {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&FailureReasonEntry> for FailureReasonRow {
    fn from(entry: &FailureReasonEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
            is_active: entry.is_active,
            created_at: entry.created_at,
        }
    }
}

impl From<FailureReasonRow> for FailureReasonEntry {
    fn from(row: FailureReasonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditRow {
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub user_role: Option<String>,
    pub action: String,
    pub table_name: Option<String>,
    pub record_id: Option<String>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for audit rows; `id` and `created_at` come from the store.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_logs)]
pub struct NewAuditRow {
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub user_role: Option<String>,
    pub action: String,
    pub table_name: Option<String>,
    pub record_id: Option<String>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = RowConversionError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let user_role = row
            .user_role
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e: crate::domain::ParseRoleError| {
                RowConversionError::new("user_role", e.to_string())
            })?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            user_email: row.user_email,
            user_role,
            action: row
                .action
                .parse()
                .map_err(|e: String| RowConversionError::new("action", e))?,
            table_name: row.table_name,
            record_id: row.record_id,
            old_values: row.old_values,
            new_values: row.new_values,
            ip_address: row.ip_address,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage.
    use super::*;
    use crate::domain::{InspectionResult, InspectionStatus, Role, VehicleStatus};

    #[test]
    fn vehicle_row_round_trips() {
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            plate_number: PlateNumber::new("ABC1234").expect("valid plate"),
            driver_name: Some("John Smith".to_owned()),
            national_id: None,
            company_id: Some(Uuid::new_v4()),
            equipment_type_id: None,
            year_of_manufacture: Some(2021),
            project: None,
            gate: Some("Gate 2".to_owned()),
            status: VehicleStatus::Rejected,
            next_inspection_date: Some("2026-01-01".parse().expect("valid date")),
            blacklisted: false,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let row = VehicleRow::from(&vehicle);
        assert_eq!(row.status, "rejected");
        let back = Vehicle::try_from(row).expect("row converts");
        assert_eq!(back, vehicle);
    }

    #[test]
    fn unknown_status_fails_conversion() {
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            plate_number: PlateNumber::new("ABC1234").expect("valid plate"),
            driver_name: None,
            national_id: None,
            company_id: None,
            equipment_type_id: None,
            year_of_manufacture: None,
            project: None,
            gate: None,
            status: VehicleStatus::Verified,
            next_inspection_date: None,
            blacklisted: false,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut row = VehicleRow::from(&vehicle);
        row.status = "impounded".to_owned();
        let err = Vehicle::try_from(row).expect_err("unknown status rejected");
        assert_eq!(err.column, "status");
    }

    #[test]
    fn inspection_row_encodes_failure_reason_legacy_string() {
        let inspection = Inspection {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            inspection_type: crate::domain::InspectionType::Routine,
            assignment_id: None,
            assigned_inspector_id: None,
            assigned_by: None,
            scheduled_date: Utc::now(),
            started_at: None,
            completed_at: Some(Utc::now()),
            result: InspectionResult::Fail,
            failure_reason: FailureReason::new(
                vec!["Brakes".to_owned()],
                Some("handbrake slack".to_owned()),
            ),
            notes: None,
            verified_by: None,
            verified_at: None,
            status: InspectionStatus::Completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let row = InspectionRow::from(&inspection);
        assert_eq!(
            row.failure_reason.as_deref(),
            Some("Brakes, Other: handbrake slack")
        );
        let back = Inspection::try_from(row).expect("row converts");
        assert_eq!(back.failure_reason, inspection.failure_reason);
    }

    #[test]
    fn audit_row_parses_role_and_action() {
        let row = AuditRow {
            id: 9,
            user_id: None,
            user_email: Some("admin@example.com".to_owned()),
            user_role: Some("admin".to_owned()),
            action: "UPDATE".to_owned(),
            table_name: Some("assignments".to_owned()),
            record_id: None,
            old_values: None,
            new_values: None,
            ip_address: None,
            created_at: Utc::now(),
        };
        let entry = AuditEntry::try_from(row).expect("row converts");
        assert_eq!(entry.user_role, Some(Role::Admin));
    }
}
