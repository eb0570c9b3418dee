//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use super::{
    enums::{EquipmentStatus, EquipmentType},
    follow_up::FollowUp,
};

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub school_id: i32,
    pub name: String,
    pub equipment_type: EquipmentType,
    /// Free-text type, only set when `equipment_type` is "other"
    pub other_type: Option<String>,
    pub location: String,
    pub acquired_date: NaiveDate,
    pub status: EquipmentStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Selectable location for equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentLocation {
    pub id: i32,
    pub name: String,
}

/// Equipment create/update request (the edit form always sends every field)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EquipmentForm {
    #[validate(length(min = 1, max = 255, message = "The equipment name field is required."))]
    pub name: String,
    pub equipment_type: EquipmentType,
    #[validate(length(max = 255))]
    pub other_type: Option<String>,
    #[validate(length(min = 1, max = 255, message = "The location field is required."))]
    pub location: String,
    pub acquired_date: NaiveDate,
    pub status: EquipmentStatus,
}

impl EquipmentForm {
    /// Field checks that depend on more than one field, then normalization:
    /// `other_type` is required for "other" and dropped for every other type.
    pub fn normalized(mut self) -> Result<Self, ValidationErrors> {
        self.validate()?;
        if self.equipment_type == EquipmentType::Other {
            let label = self
                .other_type
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            if label.is_none() {
                let mut errors = ValidationErrors::new();
                let mut err = ValidationError::new("required_if");
                err.message = Some("Please specify the equipment type.".into());
                errors.add("other_type", err);
                return Err(errors);
            }
            self.other_type = label;
        } else {
            self.other_type = None;
        }
        Ok(self)
    }
}

/// Status-only update, accepted from school and PPD admins
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEquipmentStatus {
    /// One of the equipment status labels
    pub status: String,
}

impl UpdateEquipmentStatus {
    /// The status is checked against the fixed set here so that an unknown
    /// label comes back as a field error rather than a body rejection.
    pub fn parsed(&self) -> Result<EquipmentStatus, ValidationErrors> {
        self.status.parse().map_err(|_| {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("in");
            err.message = Some("The selected status is invalid.".into());
            errors.add("status", err);
            errors
        })
    }
}

/// Equipment list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    /// Search in equipment name
    pub name: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Equipment edit page: the record, its follow-up thread and its school
#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentDetail {
    pub equipment: Equipment,
    pub follow_ups: Vec<FollowUp>,
    pub school_id: i32,
    /// Whether new follow-ups can be added in the current status
    pub accepts_follow_up: bool,
}

/// Message plus the updated record
#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentResponse {
    pub message: String,
    pub equipment: Equipment,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(equipment_type: EquipmentType, other_type: Option<&str>) -> EquipmentForm {
        EquipmentForm {
            name: "Kamera Sony".to_string(),
            equipment_type,
            other_type: other_type.map(str::to_string),
            location: "Bilik Studio".to_string(),
            acquired_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: EquipmentStatus::Berfungsi,
        }
    }

    #[test]
    fn test_other_type_required_for_other() {
        let errors = form(EquipmentType::Other, Some("  ")).normalized().unwrap_err();
        assert!(errors.field_errors().contains_key("other_type"));

        let ok = form(EquipmentType::Other, Some(" Kamera ")).normalized().unwrap();
        assert_eq!(ok.other_type.as_deref(), Some("Kamera"));
    }

    #[test]
    fn test_other_type_cleared_for_known_types() {
        let ok = form(EquipmentType::Laptop, Some("leftover")).normalized().unwrap();
        assert_eq!(ok.other_type, None);
    }

    #[test]
    fn test_status_update_validation() {
        let valid = UpdateEquipmentStatus { status: "Penyelenggaraan".to_string() };
        assert_eq!(valid.parsed().unwrap(), EquipmentStatus::Penyelenggaraan);

        let invalid = UpdateEquipmentStatus { status: "Hilang".to_string() };
        let errors = invalid.parsed().unwrap_err();
        assert!(errors.field_errors().contains_key("status"));
    }

    #[test]
    fn test_form_deserializes_labels() {
        let json = serde_json::json!({
            "name": "Mic Boya",
            "equipment_type": "Microphone",
            "location": "Bilik Studio",
            "acquired_date": "2023-11-20",
            "status": "Tidak Berfungsi"
        });
        let form: EquipmentForm = serde_json::from_value(json).unwrap();
        assert_eq!(form.equipment_type, EquipmentType::Microphone);
        assert_eq!(form.status, EquipmentStatus::TidakBerfungsi);
        assert_eq!(form.other_type, None);
    }
}
