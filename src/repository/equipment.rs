//! Equipment domain methods on Repository

use chrono::Utc;
use sqlx::PgConnection;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{Equipment, EquipmentForm, EquipmentLocation, EquipmentQuery},
        stats::StatusCount,
    },
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Equipment {} not found", id))
}

impl Repository {
    /// Equipment of one school filtered by name and status, with pagination
    pub async fn equipment_search(
        &self,
        school_id: i32,
        query: &EquipmentQuery,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Equipment>, i64)> {
        let pattern = query.name.as_ref().map(|n| format!("%{}%", n.trim()));
        let filter = r#"
            WHERE school_id = $1
              AND ($2::text IS NULL OR name ILIKE $2)
              AND ($3::text IS NULL OR status = $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM equipment {}", filter))
            .bind(school_id)
            .bind(&pattern)
            .bind(query.status)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Equipment>(&format!(
            "SELECT * FROM equipment {} ORDER BY name, id LIMIT $4 OFFSET $5",
            filter
        ))
        .bind(school_id)
        .bind(&pattern)
        .bind(query.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Get equipment by ID
    pub async fn equipment_get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Get equipment by ID and lock the row for the rest of the transaction
    pub async fn equipment_lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Create equipment for a school
    pub async fn equipment_create(&self, school_id: i32, data: &EquipmentForm) -> AppResult<Equipment> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (school_id, name, equipment_type, other_type, location,
                                   acquired_date, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(school_id)
        .bind(data.name.trim())
        .bind(data.equipment_type)
        .bind(&data.other_type)
        .bind(data.location.trim())
        .bind(data.acquired_date)
        .bind(data.status)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace every editable field of an equipment record
    pub async fn equipment_update(&self, id: i32, data: &EquipmentForm) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET name = $1, equipment_type = $2, other_type = $3, location = $4,
                acquired_date = $5, status = $6, updated_at = $7
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.equipment_type)
        .bind(&data.other_type)
        .bind(data.location.trim())
        .bind(data.acquired_date)
        .bind(data.status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Set the status inside a caller-owned transaction
    pub async fn equipment_set_status(
        &self,
        conn: &mut PgConnection,
        id: i32,
        status: EquipmentStatus,
    ) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Delete equipment; its follow-ups go with it
    pub async fn equipment_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Equipment totals of a school grouped by status
    pub async fn equipment_count_by_status(&self, school_id: i32) -> AppResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM equipment
            WHERE school_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Selectable equipment locations
    pub async fn equipment_locations(&self) -> AppResult<Vec<EquipmentLocation>> {
        let rows = sqlx::query_as::<_, EquipmentLocation>(
            "SELECT id, name FROM equipment_locations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
