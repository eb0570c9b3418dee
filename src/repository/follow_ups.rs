//! Equipment follow-up methods on Repository

use chrono::Utc;
use sqlx::{types::Json, PgConnection};

use super::Repository;
use crate::{
    error::AppResult,
    models::follow_up::{FollowUp, FollowUpRow},
};

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT f.id, f.equipment_id, f.user_id, f.content, f.images, f.follow_up_date,
           f.created_at, u.name AS author_name, u.role AS author_role
    FROM equipment_follow_ups f
    JOIN users u ON u.id = f.user_id
"#;

impl Repository {
    /// Follow-up thread of an equipment record, newest first
    pub async fn follow_ups_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<FollowUp>> {
        let rows = sqlx::query_as::<_, FollowUpRow>(&format!(
            "{} WHERE f.equipment_id = $1 ORDER BY f.created_at DESC, f.id DESC",
            SELECT_WITH_AUTHOR
        ))
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FollowUp::from).collect())
    }

    /// Insert a follow-up dated today inside a caller-owned transaction.
    ///
    /// An empty image list is stored as NULL.
    pub async fn follow_ups_create(
        &self,
        conn: &mut PgConnection,
        equipment_id: i32,
        user_id: i32,
        content: Option<&str>,
        images: &[String],
    ) -> AppResult<FollowUp> {
        let now = Utc::now();
        let images = (!images.is_empty()).then(|| Json(images.to_vec()));

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipment_follow_ups (equipment_id, user_id, content, images,
                                              follow_up_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(equipment_id)
        .bind(user_id)
        .bind(content)
        .bind(images)
        .bind(now.date_naive())
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        let row = sqlx::query_as::<_, FollowUpRow>(&format!("{} WHERE f.id = $1", SELECT_WITH_AUTHOR))
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row.into())
    }
}
