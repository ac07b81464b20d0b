//! Company and equipment-type read models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A contracting company whose vehicles pass through the gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub project: Option<String>,
    pub gate: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Broad equipment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Vehicle,
    HeavyEquipment,
}

impl EquipmentCategory {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::HeavyEquipment => "heavy_equipment",
        }
    }
}

impl std::str::FromStr for EquipmentCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "vehicle" => Ok(Self::Vehicle),
            "heavy_equipment" => Ok(Self::HeavyEquipment),
            other => Err(format!("unknown equipment category: {other}")),
        }
    }
}

/// A named equipment type, such as a crane class or truck category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentType {
    pub id: Uuid,
    pub name: String,
    pub category: EquipmentCategory,
    pub classification: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
