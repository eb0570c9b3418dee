//! Statistics service

use crate::{
    error::AppResult,
    models::{
        enums::ApprovalStatus,
        stats::{PpdStats, SchoolStats},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Version counters of the school owned by the caller and the size of its
    /// district. All zeros when the caller owns no school.
    pub async fn ppd(&self, claims: &UserClaims) -> AppResult<PpdStats> {
        let Some(school) = self.repository.schools_get_by_owner(claims.user_id).await? else {
            return Ok(PpdStats::default());
        };

        Ok(PpdStats {
            approved_tvpss: self
                .repository
                .school_versions_count_by_status(school.id, ApprovalStatus::Approved)
                .await?,
            pending_validation: self
                .repository
                .school_versions_count_by_status(school.id, ApprovalStatus::Pending)
                .await?,
            schools_in_district: self.repository.schools_count_in_district(&school.district).await?,
        })
    }

    /// Dashboard counters of the caller's own school
    pub async fn school(&self, claims: &UserClaims) -> AppResult<SchoolStats> {
        let Some(school) = self.repository.schools_get_by_owner(claims.user_id).await? else {
            return Ok(SchoolStats::default());
        };

        let equipment_by_status = self.repository.equipment_count_by_status(school.id).await?;
        Ok(SchoolStats {
            equipment_total: equipment_by_status.iter().map(|c| c.count).sum(),
            equipment_by_status,
            students: self.repository.students_count(school.id).await?,
            pending_crew_applications: self.repository.crews_count_pending(school.id).await?,
        })
    }
}
