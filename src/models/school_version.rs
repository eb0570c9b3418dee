//! TVPSS version record, its approval outcomes and submission rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ApprovalStatus;
use crate::error::{AppError, AppResult};

/// Highest TVPSS version a school can reach
pub const MAX_VERSION: i16 = 4;

/// Label shown instead of a next version once the school is at the top level
pub const VERSION_QUOTA_EXHAUSTED: &str = "Versi Dipenuhi";

/// Capability flag label when the feature is present / absent
const FLAG_PRESENT: &str = "ADA";
const FLAG_ABSENT: &str = "TIADA";

/// A version number, or a placeholder text where there is none
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VersionLabel {
    Level(i16),
    Text(String),
}

/// Suggested next version for a school currently at `current`
pub fn next_version(current: i16) -> VersionLabel {
    if current < MAX_VERSION {
        VersionLabel::Level(current + 1)
    } else {
        VersionLabel::Text(VERSION_QUOTA_EXHAUSTED.to_string())
    }
}

/// Version numbers only move forward and never past the cap
pub fn check_submission(current: Option<i16>, requested: i16) -> AppResult<()> {
    if !(0..=MAX_VERSION).contains(&requested) {
        return Err(AppError::Validation(format!(
            "Version must be between 0 and {}",
            MAX_VERSION
        )));
    }
    match current {
        Some(current) if requested < current => Err(AppError::BusinessRule(format!(
            "Version cannot go back from {} to {}",
            current, requested
        ))),
        _ => Ok(()),
    }
}

/// TVPSS version record (one per school)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchoolVersion {
    pub id: i32,
    pub school_id: i32,
    pub version: i16,
    pub has_tvpss_logo: bool,
    pub has_studio: bool,
    pub uploads_to_youtube: bool,
    pub records_in_school: bool,
    pub records_out_of_school: bool,
    pub collaborates_with_agency: bool,
    pub has_green_screen: bool,
    pub status: ApprovalStatus,
    pub ppd_approval: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Version submission from a school admin
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitVersion {
    #[validate(range(min = 0, max = 4, message = "The version must be between 0 and 4."))]
    pub version: i16,
    #[serde(default)]
    pub has_tvpss_logo: bool,
    #[serde(default)]
    pub has_studio: bool,
    #[serde(default)]
    pub uploads_to_youtube: bool,
    #[serde(default)]
    pub records_in_school: bool,
    #[serde(default)]
    pub records_out_of_school: bool,
    #[serde(default)]
    pub collaborates_with_agency: bool,
    #[serde(default)]
    pub has_green_screen: bool,
}

/// Outcome of a review action: the values written to `ppd_approval` and `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub ppd_approval: bool,
    pub status: ApprovalStatus,
}

/// Review actions available to district and state officers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    PpdApprove,
    PpdReject,
    StateApprove,
    StateReject,
}

impl ReviewAction {
    /// Values to persist for this action against the current record.
    ///
    /// District approval leaves the status at Pending: the submission then
    /// waits for the state decision, which requires the district flag.
    pub fn outcome(self, current: &SchoolVersion) -> AppResult<ReviewOutcome> {
        match self {
            ReviewAction::PpdApprove => Ok(ReviewOutcome {
                ppd_approval: true,
                status: ApprovalStatus::Pending,
            }),
            ReviewAction::PpdReject | ReviewAction::StateReject => Ok(ReviewOutcome {
                ppd_approval: false,
                status: ApprovalStatus::Rejected,
            }),
            ReviewAction::StateApprove if current.ppd_approval => Ok(ReviewOutcome {
                ppd_approval: true,
                status: ApprovalStatus::Approved,
            }),
            ReviewAction::StateApprove => Err(AppError::BusinessRule(
                "TVPSS Version has not been approved by PPD.".to_string(),
            )),
        }
    }

    /// Message returned to the reviewer
    pub fn message(self) -> &'static str {
        match self {
            ReviewAction::PpdApprove | ReviewAction::StateApprove => {
                "TVPSS Version successfully approved!"
            }
            ReviewAction::PpdReject | ReviewAction::StateReject => {
                "TVPSS Version has been rejected."
            }
        }
    }
}

/// Capability flags rendered for the review page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CapabilityInfo {
    pub is_tvpss_logo: String,
    pub studio: String,
    pub youtube: String,
    pub in_school_recording: String,
    pub out_school_recording: String,
    pub collaboration: String,
    pub green_screen: String,
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => FLAG_PRESENT,
        _ => FLAG_ABSENT,
    }
    .to_string()
}

impl CapabilityInfo {
    pub fn from_version(version: Option<&SchoolVersion>) -> Self {
        CapabilityInfo {
            is_tvpss_logo: flag(version.map(|v| v.has_tvpss_logo)),
            studio: flag(version.map(|v| v.has_studio)),
            youtube: flag(version.map(|v| v.uploads_to_youtube)),
            in_school_recording: flag(version.map(|v| v.records_in_school)),
            out_school_recording: flag(version.map(|v| v.records_out_of_school)),
            collaboration: flag(version.map(|v| v.collaborates_with_agency)),
            green_screen: flag(version.map(|v| v.has_green_screen)),
        }
    }
}

/// Review page props for one school
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TvpssView {
    /// "School Name (CODE)"
    pub school_name: String,
    pub school_code: String,
    pub officer: Option<String>,
    pub info: CapabilityInfo,
    /// Status of the submission, "Null" when there is none
    pub status: String,
    pub ppd_approval: bool,
    pub current_version: i16,
    /// Next version number, or "Versi Dipenuhi"
    #[schema(value_type = String)]
    pub next_version: VersionLabel,
}

impl TvpssView {
    pub fn new(
        school_name: &str,
        school_code: &str,
        officer: Option<String>,
        version: Option<&SchoolVersion>,
    ) -> Self {
        let current = version.map(|v| v.version).unwrap_or(0);
        TvpssView {
            school_name: format!("{} ({})", school_name, school_code),
            school_code: school_code.to_string(),
            officer,
            info: CapabilityInfo::from_version(version),
            status: version
                .map(|v| v.status.as_str().to_string())
                .unwrap_or_else(|| "Null".to_string()),
            ppd_approval: version.map(|v| v.ppd_approval).unwrap_or(false),
            current_version: current,
            next_version: next_version(current),
        }
    }
}

/// Response of a review action
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub message: String,
    pub school_version: SchoolVersion,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(level: i16, ppd_approval: bool, status: ApprovalStatus) -> SchoolVersion {
        SchoolVersion {
            id: 1,
            school_id: 1,
            version: level,
            has_tvpss_logo: true,
            has_studio: false,
            uploads_to_youtube: true,
            records_in_school: true,
            records_out_of_school: false,
            collaborates_with_agency: false,
            has_green_screen: true,
            status,
            ppd_approval,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_ppd_approve_keeps_pending() {
        let current = version(2, false, ApprovalStatus::Pending);
        let outcome = ReviewAction::PpdApprove.outcome(&current).unwrap();
        assert!(outcome.ppd_approval);
        assert_eq!(outcome.status, ApprovalStatus::Pending);
    }

    #[test]
    fn test_ppd_reject() {
        let current = version(2, true, ApprovalStatus::Pending);
        let outcome = ReviewAction::PpdReject.outcome(&current).unwrap();
        assert!(!outcome.ppd_approval);
        assert_eq!(outcome.status, ApprovalStatus::Rejected);
    }

    #[test]
    fn test_state_approve_requires_ppd_flag() {
        let waiting = version(3, false, ApprovalStatus::Pending);
        assert!(matches!(
            ReviewAction::StateApprove.outcome(&waiting),
            Err(AppError::BusinessRule(_))
        ));

        let endorsed = version(3, true, ApprovalStatus::Pending);
        let outcome = ReviewAction::StateApprove.outcome(&endorsed).unwrap();
        assert_eq!(outcome.status, ApprovalStatus::Approved);
        assert!(outcome.ppd_approval);
    }

    #[test]
    fn test_next_version_suggestion() {
        assert_eq!(next_version(0), VersionLabel::Level(1));
        assert_eq!(next_version(2), VersionLabel::Level(3));
        assert_eq!(
            next_version(4),
            VersionLabel::Text(VERSION_QUOTA_EXHAUSTED.to_string())
        );
    }

    #[test]
    fn test_submission_rules() {
        assert!(check_submission(None, 0).is_ok());
        assert!(check_submission(Some(1), 2).is_ok());
        assert!(check_submission(Some(2), 2).is_ok());
        assert!(matches!(
            check_submission(Some(3), 2),
            Err(AppError::BusinessRule(_))
        ));
        assert!(matches!(check_submission(Some(4), 5), Err(AppError::Validation(_))));
        assert!(matches!(check_submission(None, -1), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_view_for_school_at_version_one_after_submitting_two() {
        let mut v = version(1, false, ApprovalStatus::Approved);
        check_submission(Some(v.version), 2).unwrap();
        v.version = 2;
        let view = TvpssView::new("SK Seri Alam", "JBA1234", None, Some(&v));
        assert_eq!(view.current_version, 2);
        assert_eq!(view.next_version, VersionLabel::Level(3));
        assert_eq!(view.school_name, "SK Seri Alam (JBA1234)");
    }

    #[test]
    fn test_view_at_cap_and_without_record() {
        let v = version(4, true, ApprovalStatus::Approved);
        let view = TvpssView::new("SK Seri Alam", "JBA1234", None, Some(&v));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["next_version"], VERSION_QUOTA_EXHAUSTED);
        assert_eq!(json["info"]["studio"], "TIADA");
        assert_eq!(json["info"]["green_screen"], "ADA");

        let empty = TvpssView::new("SK Seri Alam", "JBA1234", None, None);
        assert_eq!(empty.current_version, 0);
        assert_eq!(empty.status, "Null");
        assert_eq!(empty.info.is_tvpss_logo, "TIADA");
        assert_eq!(empty.next_version, VersionLabel::Level(1));
    }
}
