//! Crew application methods on Repository

use chrono::Utc;

use super::{conflict_on_unique, Repository};

/// Shown when a student applies while an earlier application is undecided
pub const PENDING_EXISTS: &str = "You already have a pending crew application.";
use crate::{
    error::{AppError, AppResult},
    models::{
        crew::{Crew, CrewApplication, CrewQuery},
        enums::ApprovalStatus,
    },
};

impl Repository {
    /// Applications of one student, newest first
    pub async fn crews_for_student(&self, student_id: i32) -> AppResult<Vec<Crew>> {
        let rows = sqlx::query_as::<_, Crew>(
            "SELECT * FROM crews WHERE student_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Applications of a school's students joined with the applicant
    pub async fn crews_for_school(
        &self,
        school_id: i32,
        query: &CrewQuery,
    ) -> AppResult<Vec<CrewApplication>> {
        let rows = sqlx::query_as::<_, CrewApplication>(
            r#"
            SELECT c.id, c.student_id, s.name AS student_name, s.class_name,
                   c.position, c.status, c.created_at
            FROM crews c
            JOIN students s ON s.id = c.student_id
            WHERE s.school_id = $1 AND ($2::text IS NULL OR c.status = $2)
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(school_id)
        .bind(query.status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn crews_get_by_id(&self, id: i32) -> AppResult<Crew> {
        sqlx::query_as::<_, Crew>("SELECT * FROM crews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Crew application {} not found", id)))
    }

    pub async fn crews_has_pending(&self, student_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM crews WHERE student_id = $1 AND status = $2)",
        )
        .bind(student_id)
        .bind(ApprovalStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn crews_count_pending(&self, school_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM crews c
            JOIN students s ON s.id = c.student_id
            WHERE s.school_id = $1 AND c.status = $2
            "#,
        )
        .bind(school_id)
        .bind(ApprovalStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// New application, always pending; a second pending one is a conflict
    pub async fn crews_create(&self, student_id: i32, position: &str) -> AppResult<Crew> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Crew>(
            r#"
            INSERT INTO crews (student_id, position, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(position.trim())
        .bind(ApprovalStatus::Pending)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, PENDING_EXISTS))?;
        Ok(row)
    }

    /// Decide an application; only a still-pending row is changed
    pub async fn crews_set_status(&self, id: i32, status: ApprovalStatus) -> AppResult<Crew> {
        sqlx::query_as::<_, Crew>(
            r#"
            UPDATE crews SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .bind(ApprovalStatus::Pending)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict("Application has already been decided.".to_string()))
    }
}
