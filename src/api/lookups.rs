//! Option lists for equipment forms

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        enums::{EquipmentStatus, EquipmentType},
        equipment::EquipmentLocation,
    },
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct StatusOptions {
    pub status: Vec<EquipmentStatus>,
}

/// Equipment status values
#[utoipa::path(
    get,
    path = "/status-options",
    tag = "lookups",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status values", body = StatusOptions)
    )
)]
pub async fn status_options(AuthenticatedUser(_claims): AuthenticatedUser) -> Json<StatusOptions> {
    Json(StatusOptions {
        status: EquipmentStatus::ALL.to_vec(),
    })
}

/// Equipment type values
#[utoipa::path(
    get,
    path = "/equipment-types",
    tag = "lookups",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Type values", body = Vec<EquipmentType>)
    )
)]
pub async fn equipment_types(AuthenticatedUser(_claims): AuthenticatedUser) -> Json<Vec<EquipmentType>> {
    Json(EquipmentType::ALL.to_vec())
}

/// Selectable equipment locations
#[utoipa::path(
    get,
    path = "/equipment-locations",
    tag = "lookups",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Locations", body = Vec<EquipmentLocation>)
    )
)]
pub async fn equipment_locations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<EquipmentLocation>>> {
    Ok(Json(state.services.equipment.locations().await?))
}
