//! Student crew (studcrew) applications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ApprovalStatus;
use crate::error::{AppError, AppResult};

/// Crew application of a student for a production position
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Crew {
    pub id: i32,
    pub student_id: i32,
    /// Position applied for (jawatan)
    pub position: String,
    pub status: ApprovalStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Crew application joined with the applying student, for the school admin list
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CrewApplication {
    pub id: i32,
    pub student_id: i32,
    pub student_name: String,
    pub class_name: Option<String>,
    pub position: String,
    pub status: ApprovalStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Apply for a crew position
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplyCrew {
    #[validate(length(min = 1, max = 100, message = "The position field is required."))]
    pub position: String,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CrewQuery {
    pub status: Option<ApprovalStatus>,
}

/// Decision of a school admin on an application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrewDecision {
    Approve,
    Reject,
}

impl CrewDecision {
    /// Only pending applications can be decided
    pub fn apply(self, current: ApprovalStatus) -> AppResult<ApprovalStatus> {
        if current != ApprovalStatus::Pending {
            return Err(AppError::BusinessRule(format!(
                "Application has already been {}",
                current.as_str().to_lowercase()
            )));
        }
        Ok(match self {
            CrewDecision::Approve => ApprovalStatus::Approved,
            CrewDecision::Reject => ApprovalStatus::Rejected,
        })
    }

    pub fn message(self) -> &'static str {
        match self {
            CrewDecision::Approve => "Crew application approved.",
            CrewDecision::Reject => "Crew application rejected.",
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CrewResponse {
    pub message: String,
    pub crew: Crew,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decisions_on_pending() {
        assert_eq!(
            CrewDecision::Approve.apply(ApprovalStatus::Pending).unwrap(),
            ApprovalStatus::Approved
        );
        assert_eq!(
            CrewDecision::Reject.apply(ApprovalStatus::Pending).unwrap(),
            ApprovalStatus::Rejected
        );
    }

    #[test]
    fn test_decided_applications_are_final() {
        assert!(CrewDecision::Approve.apply(ApprovalStatus::Rejected).is_err());
        assert!(CrewDecision::Reject.apply(ApprovalStatus::Approved).is_err());
    }

    #[test]
    fn test_apply_requires_position() {
        assert!(ApplyCrew { position: String::new() }.validate().is_err());
        assert!(ApplyCrew { position: "Jurukamera".to_string() }.validate().is_ok());
    }
}
