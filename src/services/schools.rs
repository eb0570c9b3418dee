//! School listing, lookup and onboarding

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        school::{CreateSchool, School, SchoolEquipmentCount, SchoolList, UpdateSchoolInfo},
        scope::SchoolScope,
        user::UserClaims,
    },
    repository::Repository,
};

/// Shown to a district officer whose account has no district
pub const NO_DISTRICT_SCHOOLS: &str = "No schools found for your district.";

#[derive(Clone)]
pub struct SchoolsService {
    repository: Repository,
}

impl SchoolsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Status list of every school the caller may see
    pub async fn list_status(&self, claims: &UserClaims) -> AppResult<SchoolList> {
        let scope = SchoolScope::for_claims(claims);
        let message = match (&scope, claims.role) {
            (SchoolScope::Nothing, Role::PpdAdmin) => Some(NO_DISTRICT_SCHOOLS.to_string()),
            _ => None,
        };
        let rows = self.repository.schools_list_status(&scope).await?;
        Ok(SchoolList {
            schools: rows.into_iter().map(Into::into).collect(),
            message,
        })
    }

    /// School by code, if the caller may see it
    pub async fn visible_by_code(&self, claims: &UserClaims, code: &str) -> AppResult<School> {
        let school = self
            .repository
            .schools_get_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("School not found.".to_string()))?;
        SchoolScope::for_claims(claims).ensure(&school)?;
        Ok(school)
    }

    /// School by id, if the caller may see it
    pub async fn visible_by_id(&self, claims: &UserClaims, id: i32) -> AppResult<School> {
        let school = self.repository.schools_get_by_id(id).await?;
        SchoolScope::for_claims(claims).ensure(&school)?;
        Ok(school)
    }

    /// School owned by the calling school admin
    pub async fn owned(&self, claims: &UserClaims) -> AppResult<School> {
        self.repository
            .schools_get_by_owner(claims.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No school is assigned to your account.".to_string()))
    }

    pub async fn update_owned(&self, claims: &UserClaims, data: UpdateSchoolInfo) -> AppResult<School> {
        data.validate()?;
        let school = self.owned(claims).await?;
        let updated = self.repository.schools_update_info(school.id, &data).await?;
        tracing::info!(school_code = %updated.code, user_id = claims.user_id, "School info updated");
        Ok(updated)
    }

    pub async fn create(&self, data: CreateSchool) -> AppResult<School> {
        data.validate()?;
        if let Some(owner) = data.user_id {
            // Fails with not found for an unknown owner
            self.repository.users_get_by_id(owner).await?;
        }
        let school = self.repository.schools_create(&data).await?;
        tracing::info!(school_code = %school.code, "School onboarded");
        Ok(school)
    }

    /// Schools of the caller's district with their equipment counts
    pub async fn equipment_counts(&self, claims: &UserClaims) -> AppResult<Vec<SchoolEquipmentCount>> {
        match SchoolScope::for_claims(claims) {
            SchoolScope::District(district) => self.repository.schools_equipment_counts(&district).await,
            _ => Ok(Vec::new()),
        }
    }
}
