//! Student model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::crew::Crew;

/// Student record, owned by a school
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub school_id: i32,
    /// Login account of the student, when one exists
    pub user_id: Option<i32>,
    pub name: String,
    pub ic_number: String,
    pub class_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Student create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StudentForm {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    /// 12-digit identity card number
    #[validate(length(equal = 12, message = "The IC number must be 12 digits."))]
    pub ic_number: String,
    #[validate(length(max = 50))]
    pub class_name: Option<String>,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub user_id: Option<i32>,
}

/// Student list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StudentQuery {
    /// Search in student name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Student dashboard props
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDashboard {
    pub student: Student,
    pub school_name: String,
    pub school_code: String,
    pub applications: Vec<Crew>,
}
