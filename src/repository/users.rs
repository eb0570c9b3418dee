//! User domain methods on Repository

use chrono::Utc;

use super::{conflict_on_unique, Repository};
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserQuery, UserRow},
};

const EMAIL_TAKEN: &str = "The email has already been taken.";

impl Repository {
    /// Get user by ID
    pub async fn users_get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?
            .try_into()
    }

    /// Get user by email (login identifier)
    pub async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Check if email already exists
    pub async fn users_email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn users_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Search users by name/email and role, with pagination
    pub async fn users_search(
        &self,
        query: &UserQuery,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let pattern = query.name.as_ref().map(|n| format!("%{}%", n.trim()));
        let filter = r#"
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
              AND ($2::smallint IS NULL OR role = $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {}", filter))
            .bind(&pattern)
            .bind(query.role)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT * FROM users {} ORDER BY name LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(&pattern)
        .bind(query.role)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }

    /// Create a user with an already hashed password
    pub async fn users_create(&self, data: &CreateUser, password_hash: &str) -> AppResult<User> {
        let now = Utc::now();
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password, role, state, district, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.email.trim())
        .bind(password_hash)
        .bind(data.role)
        .bind(data.state.trim())
        .bind(data.district.trim())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))?
        .try_into()
    }

    /// Update a user; the password is only replaced when a new hash is given
    pub async fn users_update(
        &self,
        id: i32,
        data: &UpdateUser,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $1, email = $2, password = COALESCE($3, password),
                role = $4, state = $5, district = $6, updated_at = $7
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.email.trim())
        .bind(password_hash)
        .bind(data.role)
        .bind(data.state.trim())
        .bind(data.district.trim())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?
        .try_into()
    }

    /// Delete a user
    pub async fn users_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "User has authored follow-ups and cannot be deleted.".to_string(),
                        );
                    }
                }
                AppError::Database(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
