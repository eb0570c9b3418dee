//! TVPSS version review and submission

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        school::School,
        school_version::{check_submission, ReviewAction, SchoolVersion, SubmitVersion, TvpssView},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct VersionsService {
    repository: Repository,
}

impl VersionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Review page projection of a school
    pub async fn view(&self, school: &School) -> AppResult<TvpssView> {
        let version = self.repository.school_versions_get(school.id).await?;
        Ok(TvpssView::new(
            &school.name,
            &school.code,
            school.officer_name.clone(),
            version.as_ref(),
        ))
    }

    /// Apply a district or state review action to a school's version
    pub async fn review(&self, school: &School, action: ReviewAction) -> AppResult<SchoolVersion> {
        let current = self
            .repository
            .school_versions_get(school.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("TVPSS Version not found for the given school.".to_string())
            })?;

        let outcome = action.outcome(&current)?;
        let updated = self.repository.school_versions_set_review(current.id, outcome).await?;
        tracing::info!(
            school_code = %school.code,
            status = %updated.status,
            ppd_approval = updated.ppd_approval,
            "TVPSS version reviewed"
        );
        Ok(updated)
    }

    /// Record a new self-assessment for the school
    pub async fn submit(&self, school: &School, data: SubmitVersion) -> AppResult<TvpssView> {
        data.validate()?;
        let current = self.repository.school_versions_get(school.id).await?;
        check_submission(current.as_ref().map(|v| v.version), data.version)?;

        let saved = self.repository.school_versions_submit(school.id, &data).await?;
        tracing::info!(school_code = %school.code, version = saved.version, "TVPSS version submitted");
        Ok(TvpssView::new(
            &school.name,
            &school.code,
            school.officer_name.clone(),
            Some(&saved),
        ))
    }
}
