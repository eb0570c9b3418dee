//! Equipment records, status changes and follow-up threads

use std::sync::Arc;

use chrono::Utc;

use super::storage::{self, FileStore};
use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
    models::{
        equipment::{
            Equipment, EquipmentDetail, EquipmentForm, EquipmentLocation, EquipmentQuery,
            UpdateEquipmentStatus,
        },
        follow_up::{FollowUp, NewFollowUp},
        school::School,
        scope::SchoolScope,
        user::UserClaims,
    },
    repository::Repository,
};

const FOLLOW_UP_NOT_ALLOWED: &str = "Follow-ups can only be created for specific statuses.";

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    store: Arc<dyn FileStore>,
    storage: StorageConfig,
}

impl EquipmentService {
    pub fn new(repository: Repository, store: Arc<dyn FileStore>, storage: StorageConfig) -> Self {
        Self { repository, store, storage }
    }

    /// Equipment page of one school
    pub async fn list(
        &self,
        school: &School,
        query: &EquipmentQuery,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Equipment>, i64)> {
        self.repository.equipment_search(school.id, query, limit, offset).await
    }

    /// Scope check shared by every per-record operation
    async fn ensure_visible(&self, claims: &UserClaims, equipment: &Equipment) -> AppResult<School> {
        let school = self.repository.schools_get_by_id(equipment.school_id).await?;
        if !SchoolScope::for_claims(claims).permits(&school) {
            return Err(AppError::NotFound(format!("Equipment {} not found", equipment.id)));
        }
        Ok(school)
    }

    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<Equipment> {
        let equipment = self.repository.equipment_get_by_id(id).await?;
        self.ensure_visible(claims, &equipment).await?;
        Ok(equipment)
    }

    /// Equipment with its follow-up thread
    pub async fn detail(&self, claims: &UserClaims, id: i32) -> AppResult<EquipmentDetail> {
        let equipment = self.get(claims, id).await?;
        let follow_ups = self.repository.follow_ups_for_equipment(id).await?;
        Ok(EquipmentDetail {
            school_id: equipment.school_id,
            accepts_follow_up: equipment.status.accepts_follow_up(),
            equipment,
            follow_ups,
        })
    }

    pub async fn create(&self, school: &School, form: EquipmentForm) -> AppResult<Equipment> {
        let form = form.normalized()?;
        let equipment = self.repository.equipment_create(school.id, &form).await?;
        tracing::info!(equipment_id = equipment.id, school_code = %school.code, "Equipment created");
        Ok(equipment)
    }

    pub async fn update(&self, claims: &UserClaims, id: i32, form: EquipmentForm) -> AppResult<Equipment> {
        let form = form.normalized()?;
        self.get(claims, id).await?;
        let equipment = self.repository.equipment_update(id, &form).await?;
        tracing::info!(equipment_id = id, user_id = claims.user_id, "Equipment updated");
        Ok(equipment)
    }

    /// Change the status in a transaction; any failure rolls it back
    pub async fn update_status(
        &self,
        claims: &UserClaims,
        id: i32,
        data: &UpdateEquipmentStatus,
    ) -> AppResult<Equipment> {
        let status = data.parsed()?;

        let mut tx = self.repository.begin().await?;
        let current = self.repository.equipment_lock(&mut tx, id).await?;
        self.ensure_visible(claims, &current).await?;

        let result: AppResult<Equipment> = async {
            let updated = self.repository.equipment_set_status(&mut tx, id, status).await?;
            tx.commit().await?;
            Ok(updated)
        }
        .await;

        match result {
            Ok(updated) => {
                tracing::info!(equipment_id = id, user_id = claims.user_id, status = %status, "Equipment status updated");
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(equipment_id = id, status = %status, "Failed to update equipment status: {}", e);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        self.get(claims, id).await?;
        self.repository.equipment_delete(id).await?;
        tracing::info!(equipment_id = id, user_id = claims.user_id, "Equipment deleted");
        Ok(())
    }

    pub async fn follow_ups(&self, claims: &UserClaims, id: i32) -> AppResult<Vec<FollowUp>> {
        self.get(claims, id).await?;
        self.repository.follow_ups_for_equipment(id).await
    }

    /// Append a follow-up with its images.
    ///
    /// The equipment row is locked while its status is checked. Images are
    /// written before the insert and removed again if the insert or commit
    /// fails, so a failed request leaves neither a record nor files behind.
    pub async fn create_follow_up(
        &self,
        claims: &UserClaims,
        id: i32,
        mut data: NewFollowUp,
    ) -> AppResult<FollowUp> {
        data.validate(self.storage.max_images_per_follow_up, self.storage.max_image_bytes)?;
        data.content = data
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let mut tx = self.repository.begin().await?;
        let equipment = self.repository.equipment_lock(&mut tx, id).await?;
        let school = self.ensure_visible(claims, &equipment).await?;

        if !equipment.status.accepts_follow_up() {
            tracing::warn!(equipment_id = id, status = %equipment.status, "Follow-up rejected for status");
            return Err(AppError::BusinessRule(FOLLOW_UP_NOT_ALLOWED.to_string()));
        }

        let paths = storage::store_images(self.store.as_ref(), school.id, Utc::now(), &data.images).await?;

        let result: AppResult<FollowUp> = async {
            let follow_up = self
                .repository
                .follow_ups_create(&mut tx, id, claims.user_id, data.content.as_deref(), &paths)
                .await?;
            tx.commit().await?;
            Ok(follow_up)
        }
        .await;

        match result {
            Ok(follow_up) => {
                tracing::info!(
                    equipment_id = id,
                    user_id = claims.user_id,
                    images = paths.len(),
                    "Follow-up saved"
                );
                Ok(follow_up)
            }
            Err(e) => {
                tracing::error!(equipment_id = id, user_id = claims.user_id, "Failed to save follow-up: {}", e);
                storage::discard(self.store.as_ref(), &paths).await;
                Err(e)
            }
        }
    }

    pub async fn locations(&self) -> AppResult<Vec<EquipmentLocation>> {
        self.repository.equipment_locations().await
    }
}

