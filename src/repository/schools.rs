//! School domain methods on Repository

use chrono::Utc;

use super::{conflict_on_unique, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        school::{CreateSchool, School, SchoolEquipmentCount, SchoolStatusRow, UpdateSchoolInfo},
        scope::SchoolScope,
    },
};

impl Repository {
    /// Schools visible in `scope`, each joined with its version record if any
    pub async fn schools_list_status(&self, scope: &SchoolScope) -> AppResult<Vec<SchoolStatusRow>> {
        let select = r#"
            SELECT s.code, s.name, s.officer_name, s.district, v.version, v.status
            FROM schools s
            LEFT JOIN school_versions v ON v.school_id = s.id
        "#;

        let rows = match scope {
            SchoolScope::Nothing => Vec::new(),
            SchoolScope::All => {
                sqlx::query_as::<_, SchoolStatusRow>(&format!("{} ORDER BY s.name", select))
                    .fetch_all(&self.pool)
                    .await?
            }
            SchoolScope::State(state) => {
                sqlx::query_as::<_, SchoolStatusRow>(&format!(
                    "{} WHERE LOWER(s.state) = LOWER($1) ORDER BY s.name",
                    select
                ))
                .bind(state)
                .fetch_all(&self.pool)
                .await?
            }
            SchoolScope::District(district) => {
                sqlx::query_as::<_, SchoolStatusRow>(&format!(
                    "{} WHERE LOWER(s.district) = LOWER($1) ORDER BY s.name",
                    select
                ))
                .bind(district)
                .fetch_all(&self.pool)
                .await?
            }
            SchoolScope::Owner(user_id) => {
                sqlx::query_as::<_, SchoolStatusRow>(&format!(
                    "{} WHERE s.user_id = $1 ORDER BY s.name",
                    select
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Get school by ID
    pub async fn schools_get_by_id(&self, id: i32) -> AppResult<School> {
        sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("School not found.".to_string()))
    }

    /// Get school by its ministry code
    pub async fn schools_get_by_code(&self, code: &str) -> AppResult<Option<School>> {
        let school = sqlx::query_as::<_, School>("SELECT * FROM schools WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(school)
    }

    /// School owned by a school admin account
    pub async fn schools_get_by_owner(&self, user_id: i32) -> AppResult<Option<School>> {
        let school = sqlx::query_as::<_, School>(
            "SELECT * FROM schools WHERE user_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(school)
    }

    /// Onboard a school
    pub async fn schools_create(&self, data: &CreateSchool) -> AppResult<School> {
        let now = Utc::now();
        sqlx::query_as::<_, School>(
            r#"
            INSERT INTO schools (code, name, officer_name, district, state, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(&data.code)
        .bind(data.name.trim())
        .bind(&data.officer_name)
        .bind(data.district.trim())
        .bind(data.state.trim())
        .bind(data.user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "The school code has already been taken."))
    }

    /// Update the editable school info
    pub async fn schools_update_info(&self, id: i32, data: &UpdateSchoolInfo) -> AppResult<School> {
        sqlx::query_as::<_, School>(
            r#"
            UPDATE schools SET name = $1, officer_name = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.officer_name.trim())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found.".to_string()))
    }

    /// Schools of a district with how many equipment records each holds
    pub async fn schools_equipment_counts(&self, district: &str) -> AppResult<Vec<SchoolEquipmentCount>> {
        let rows = sqlx::query_as::<_, SchoolEquipmentCount>(
            r#"
            SELECT s.id, s.name AS school_name, s.code AS school_code,
                   s.officer_name AS school_officer, s.district,
                   COUNT(e.id) AS equipment_count
            FROM schools s
            LEFT JOIN equipment e ON e.school_id = s.id
            WHERE LOWER(s.district) = LOWER($1)
            GROUP BY s.id
            ORDER BY s.name
            "#,
        )
        .bind(district)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn schools_count_in_district(&self, district: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM schools WHERE LOWER(district) = LOWER($1)",
        )
        .bind(district)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
