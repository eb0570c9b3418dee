//! School model and list projections

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{enums::ApprovalStatus, school_version::VersionLabel};

/// Ministry school codes: three letters followed by four digits (e.g. JBA1234)
static SCHOOL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}[0-9]{4}$").unwrap());

/// School record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct School {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub officer_name: Option<String>,
    pub district: String,
    pub state: String,
    /// School admin account owning this school
    pub user_id: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Onboard a school (super admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSchool {
    #[validate(regex(path = *SCHOOL_CODE, message = "The school code format is invalid."))]
    pub code: String,
    #[validate(length(min = 1, max = 255, message = "The school name field is required."))]
    pub name: String,
    #[validate(length(max = 255))]
    pub officer_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "The district field is required."))]
    pub district: String,
    #[validate(length(min = 1, max = 255, message = "The state field is required."))]
    pub state: String,
    pub user_id: Option<i32>,
}

/// Update own school info (school admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSchoolInfo {
    #[validate(length(min = 1, max = 255, message = "The school name field is required."))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "The officer name field is required."))]
    pub officer_name: String,
}

/// Row of the school list joined with its (optional) version record
#[derive(Debug, Clone, FromRow)]
pub struct SchoolStatusRow {
    pub code: String,
    pub name: String,
    pub officer_name: Option<String>,
    pub district: String,
    pub version: Option<i16>,
    pub status: Option<ApprovalStatus>,
}

/// Flat projection shown in the TVPSS status list pages
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SchoolStatusView {
    pub school_code: String,
    pub school_name: String,
    pub school_officer: Option<String>,
    pub district: String,
    /// Version number, or "-" when the school has not submitted one
    #[schema(value_type = String)]
    pub school_version: VersionLabel,
    /// Approval status, or "Null" when the school has not submitted one
    pub status: String,
}

impl From<SchoolStatusRow> for SchoolStatusView {
    fn from(row: SchoolStatusRow) -> Self {
        SchoolStatusView {
            school_code: row.code,
            school_name: row.name,
            school_officer: row.officer_name,
            district: row.district,
            school_version: row
                .version
                .map(VersionLabel::Level)
                .unwrap_or_else(|| VersionLabel::Text("-".to_string())),
            status: row
                .status
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "Null".to_string()),
        }
    }
}

/// School status list, with a notice when the caller has nothing to see
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SchoolList {
    pub schools: Vec<SchoolStatusView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// School with its equipment count (PPD equipment overview)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SchoolEquipmentCount {
    pub id: i32,
    pub school_name: String,
    pub school_code: String,
    pub school_officer: Option<String>,
    pub district: String,
    pub equipment_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(version: Option<i16>, status: Option<ApprovalStatus>) -> SchoolStatusRow {
        SchoolStatusRow {
            code: "JBA1234".to_string(),
            name: "SK Taman Universiti".to_string(),
            officer_name: Some("Cikgu Rahim".to_string()),
            district: "Johor Bahru".to_string(),
            version,
            status,
        }
    }

    #[test]
    fn test_projection_without_version_uses_placeholders() {
        let view = SchoolStatusView::from(row(None, None));
        assert_eq!(view.school_version, VersionLabel::Text("-".to_string()));
        assert_eq!(view.status, "Null");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["school_version"], "-");
        assert_eq!(json["status"], "Null");
    }

    #[test]
    fn test_projection_with_version() {
        let view = SchoolStatusView::from(row(Some(2), Some(ApprovalStatus::Pending)));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["school_version"], 2);
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["school_code"], "JBA1234");
    }

    #[test]
    fn test_school_code_format() {
        let mut school = CreateSchool {
            code: "JBA1234".to_string(),
            name: "SK Taman Universiti".to_string(),
            officer_name: None,
            district: "Johor Bahru".to_string(),
            state: "Johor".to_string(),
            user_id: None,
        };
        assert!(school.validate().is_ok());

        school.code = "jba-12".to_string();
        let errors = school.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
    }
}
