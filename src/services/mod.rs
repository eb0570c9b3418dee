//! Business logic services

pub mod crews;
pub mod equipment;
pub mod schools;
pub mod stats;
pub mod storage;
pub mod students;
pub mod users;
pub mod versions;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, StorageConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub schools: schools::SchoolsService,
    pub versions: versions::VersionsService,
    pub equipment: equipment::EquipmentService,
    pub students: students::StudentsService,
    pub crews: crews::CrewsService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and file store
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        storage_config: StorageConfig,
        store: Arc<dyn storage::FileStore>,
    ) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            schools: schools::SchoolsService::new(repository.clone()),
            versions: versions::VersionsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone(), store, storage_config),
            students: students::StudentsService::new(repository.clone()),
            crews: crews::CrewsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    /// Database reachability, for the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
