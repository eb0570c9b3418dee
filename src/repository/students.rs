//! Student domain methods on Repository

use chrono::Utc;

use super::{conflict_on_unique, Repository};
use crate::{
    error::{AppError, AppResult},
    models::student::{Student, StudentForm, StudentQuery},
};

const IC_TAKEN: &str = "The IC number has already been registered.";

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Student {} not found", id))
}

impl Repository {
    /// Students of one school, with pagination
    pub async fn students_search(
        &self,
        school_id: i32,
        query: &StudentQuery,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Student>, i64)> {
        let pattern = query.name.as_ref().map(|n| format!("%{}%", n.trim()));
        let filter = "WHERE school_id = $1 AND ($2::text IS NULL OR name ILIKE $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM students {}", filter))
            .bind(school_id)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Student>(&format!(
            "SELECT * FROM students {} ORDER BY name LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(school_id)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    pub async fn students_get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Student record linked to a login account
    pub async fn students_get_by_user(&self, user_id: i32) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE user_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    pub async fn students_count(&self, school_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE school_id = $1")
            .bind(school_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn students_create(&self, school_id: i32, data: &StudentForm) -> AppResult<Student> {
        let now = Utc::now();
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (school_id, user_id, name, ic_number, class_name, email, phone,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(school_id)
        .bind(data.user_id)
        .bind(data.name.trim())
        .bind(data.ic_number.trim())
        .bind(&data.class_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, IC_TAKEN))
    }

    pub async fn students_update(&self, id: i32, data: &StudentForm) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET user_id = $1, name = $2, ic_number = $3, class_name = $4, email = $5,
                phone = $6, updated_at = $7
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(data.name.trim())
        .bind(data.ic_number.trim())
        .bind(&data.class_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, IC_TAKEN))?
        .ok_or_else(|| not_found(id))
    }

    /// Delete a student; their crew applications go with them
    pub async fn students_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
