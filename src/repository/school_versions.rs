//! TVPSS version domain methods on Repository

use chrono::Utc;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ApprovalStatus,
        school_version::{ReviewOutcome, SchoolVersion, SubmitVersion},
    },
};

impl Repository {
    /// Version record of a school, if it has submitted one
    pub async fn school_versions_get(&self, school_id: i32) -> AppResult<Option<SchoolVersion>> {
        let version = sqlx::query_as::<_, SchoolVersion>(
            "SELECT * FROM school_versions WHERE school_id = $1",
        )
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(version)
    }

    /// Write a review outcome; both columns change together
    pub async fn school_versions_set_review(
        &self,
        id: i32,
        outcome: ReviewOutcome,
    ) -> AppResult<SchoolVersion> {
        sqlx::query_as::<_, SchoolVersion>(
            r#"
            UPDATE school_versions SET ppd_approval = $1, status = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(outcome.ppd_approval)
        .bind(outcome.status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("TVPSS Version not found for the given school.".to_string())
        })
    }

    /// Record a submission: creates the row on first submission, otherwise
    /// replaces level and flags and sends it back to review.
    ///
    /// The `GREATEST` guard keeps the stored level from going down even when
    /// two submissions race.
    pub async fn school_versions_submit(
        &self,
        school_id: i32,
        data: &SubmitVersion,
    ) -> AppResult<SchoolVersion> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, SchoolVersion>(
            r#"
            INSERT INTO school_versions (
                school_id, version, has_tvpss_logo, has_studio, uploads_to_youtube,
                records_in_school, records_out_of_school, collaborates_with_agency,
                has_green_screen, status, ppd_approval, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11, $11)
            ON CONFLICT (school_id) DO UPDATE SET
                version = GREATEST(school_versions.version, EXCLUDED.version),
                has_tvpss_logo = EXCLUDED.has_tvpss_logo,
                has_studio = EXCLUDED.has_studio,
                uploads_to_youtube = EXCLUDED.uploads_to_youtube,
                records_in_school = EXCLUDED.records_in_school,
                records_out_of_school = EXCLUDED.records_out_of_school,
                collaborates_with_agency = EXCLUDED.collaborates_with_agency,
                has_green_screen = EXCLUDED.has_green_screen,
                status = EXCLUDED.status,
                ppd_approval = FALSE,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(school_id)
        .bind(data.version)
        .bind(data.has_tvpss_logo)
        .bind(data.has_studio)
        .bind(data.uploads_to_youtube)
        .bind(data.records_in_school)
        .bind(data.records_out_of_school)
        .bind(data.collaborates_with_agency)
        .bind(data.has_green_screen)
        .bind(ApprovalStatus::Pending)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Number of version records of a school in the given status
    pub async fn school_versions_count_by_status(
        &self,
        school_id: i32,
        status: ApprovalStatus,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM school_versions WHERE school_id = $1 AND status = $2",
        )
        .bind(school_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
