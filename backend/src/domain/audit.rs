//! Append-only audit trail entries and render-time redaction.
//!
//! Entries are written once and never updated or deleted. Sensitive values
//! are redacted when an entry is prepared for display; storage keeps the raw
//! values so investigations retain the full record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::Role;

/// Keys whose values are replaced before an entry is displayed.
pub const SENSITIVE_AUDIT_FIELDS: [&str; 4] = ["national_id", "password", "api_key", "secret"];

const REDACTED: &str = "[REDACTED]";

/// What happened, for colour-coding and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Assign,
    Submit,
}

impl AuditAction {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Assign => "ASSIGN",
            Self::Submit => "SUBMIT",
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "LOGIN" => Ok(Self::Login),
            "ASSIGN" => Ok(Self::Assign),
            "SUBMIT" => Ok(Self::Submit),
            other => Err(format!("unknown audit action: {other}")),
        }
    }
}

/// One audit trail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Assigned by the store; zero until persisted.
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub user_role: Option<Role>,
    pub action: AuditAction,
    pub table_name: Option<String>,
    pub record_id: Option<String>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Draft for a new audit entry; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDraft {
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub user_role: Option<Role>,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: String,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
}

fn redact_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            if SENSITIVE_AUDIT_FIELDS.contains(&key.as_str()) {
                (key.clone(), Value::String(REDACTED.to_owned()))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

/// Replace sensitive values in a change snapshot for display.
///
/// Only top-level keys are considered, matching how change snapshots are
/// captured (one flat object per row).
pub fn redact_audit_values(values: Option<&Value>) -> Option<Value> {
    values.map(|value| match value {
        Value::Object(map) => Value::Object(redact_map(map)),
        other => other.clone(),
    })
}

impl AuditEntry {
    /// Copy of this entry with sensitive change values redacted.
    pub fn redacted(&self) -> Self {
        Self {
            old_values: redact_audit_values(self.old_values.as_ref()),
            new_values: redact_audit_values(self.new_values.as_ref()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_sensitive_keys_only() {
        let values = json!({
            "national_id": "1029384756",
            "driver_name": "John Smith",
            "password": "hunter2",
        });
        let redacted = redact_audit_values(Some(&values)).expect("values present");
        assert_eq!(redacted["national_id"], "[REDACTED]");
        assert_eq!(redacted["password"], "[REDACTED]");
        assert_eq!(redacted["driver_name"], "John Smith");
    }

    #[test]
    fn passes_non_objects_through() {
        let values = json!("free text");
        assert_eq!(
            redact_audit_values(Some(&values)),
            Some(json!("free text"))
        );
        assert_eq!(redact_audit_values(None), None);
    }

    #[test]
    fn entry_redaction_keeps_metadata() {
        let entry = AuditEntry {
            id: 7,
            user_id: Some(Uuid::new_v4()),
            user_email: Some("admin@example.com".to_owned()),
            user_role: Some(Role::Admin),
            action: AuditAction::Update,
            table_name: Some("vehicle_equipment".to_owned()),
            record_id: Some("abc".to_owned()),
            old_values: Some(json!({ "national_id": "123" })),
            new_values: None,
            ip_address: None,
            created_at: Utc::now(),
        };
        let redacted = entry.redacted();
        assert_eq!(redacted.id, entry.id);
        assert_eq!(redacted.action, entry.action);
        assert_eq!(
            redacted.old_values,
            Some(json!({ "national_id": "[REDACTED]" }))
        );
    }
}
