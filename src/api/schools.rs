//! School endpoints: onboarding, own school info and the scoped status lists

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        equipment::{Equipment, EquipmentQuery},
        school::{CreateSchool, School, SchoolEquipmentCount, SchoolList, UpdateSchoolInfo},
        school_version::TvpssView,
    },
};

use super::AuthenticatedUser;

/// Equipment page of one school with the school itself
#[derive(Serialize, ToSchema)]
pub struct SchoolEquipmentPage {
    pub school: School,
    pub items: Vec<Equipment>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List every school with its TVPSS status
#[utoipa::path(
    get,
    path = "/schools",
    tag = "schools",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All schools", body = SchoolList),
        (status = 403, description = "Not a super admin")
    )
)]
pub async fn list_all_schools(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SchoolList>> {
    claims.require_super_admin()?;
    Ok(Json(state.services.schools.list_status(&claims).await?))
}

/// Onboard a school
#[utoipa::path(
    post,
    path = "/schools",
    tag = "schools",
    security(("bearer_auth" = [])),
    request_body = CreateSchool,
    responses(
        (status = 201, description = "School created", body = School),
        (status = 409, description = "School code already taken"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_school(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateSchool>,
) -> AppResult<(StatusCode, Json<School>)> {
    claims.require_super_admin()?;
    let school = state.services.schools.create(data).await?;
    Ok((StatusCode::CREATED, Json(school)))
}

/// School owned by the caller
#[utoipa::path(
    get,
    path = "/school/info",
    tag = "school",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own school", body = School),
        (status = 404, description = "No school assigned")
    )
)]
pub async fn get_my_school(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<School>> {
    claims.require_school_admin()?;
    Ok(Json(state.services.schools.owned(&claims).await?))
}

/// Update school name and officer
#[utoipa::path(
    put,
    path = "/school/info",
    tag = "school",
    security(("bearer_auth" = [])),
    request_body = UpdateSchoolInfo,
    responses(
        (status = 200, description = "School updated", body = School),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_my_school(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<UpdateSchoolInfo>,
) -> AppResult<Json<School>> {
    claims.require_school_admin()?;
    Ok(Json(state.services.schools.update_owned(&claims, data).await?))
}

/// Schools of the caller's district with their TVPSS status
#[utoipa::path(
    get,
    path = "/ppd/schools",
    tag = "ppd",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "District schools", body = SchoolList)
    )
)]
pub async fn list_district_schools(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SchoolList>> {
    claims.require_ppd_admin()?;
    Ok(Json(state.services.schools.list_status(&claims).await?))
}

/// TVPSS review page of a district school
#[utoipa::path(
    get,
    path = "/ppd/schools/{code}",
    tag = "ppd",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "School TVPSS details", body = TvpssView),
        (status = 404, description = "School not found")
    )
)]
pub async fn view_district_school(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(code): Path<String>,
) -> AppResult<Json<TvpssView>> {
    claims.require_ppd_admin()?;
    let school = state.services.schools.visible_by_code(&claims, &code).await?;
    Ok(Json(state.services.versions.view(&school).await?))
}

/// Schools of the caller's state with their TVPSS status
#[utoipa::path(
    get,
    path = "/state/schools",
    tag = "state",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "State schools", body = SchoolList)
    )
)]
pub async fn list_state_schools(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SchoolList>> {
    claims.require_state_admin()?;
    Ok(Json(state.services.schools.list_status(&claims).await?))
}

/// TVPSS review page of a school in the caller's state
#[utoipa::path(
    get,
    path = "/state/schools/{code}",
    tag = "state",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "School TVPSS details", body = TvpssView),
        (status = 404, description = "School not found")
    )
)]
pub async fn view_state_school(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(code): Path<String>,
) -> AppResult<Json<TvpssView>> {
    claims.require_state_admin()?;
    let school = state.services.schools.visible_by_code(&claims, &code).await?;
    Ok(Json(state.services.versions.view(&school).await?))
}

/// District schools with their equipment counts
#[utoipa::path(
    get,
    path = "/ppd/equipment/schools",
    tag = "ppd",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Schools with equipment counts", body = Vec<SchoolEquipmentCount>)
    )
)]
pub async fn list_equipment_schools(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<SchoolEquipmentCount>>> {
    claims.require_ppd_admin()?;
    Ok(Json(state.services.schools.equipment_counts(&claims).await?))
}

/// Equipment of one district school
#[utoipa::path(
    get,
    path = "/ppd/equipment/schools/{school_id}",
    tag = "ppd",
    security(("bearer_auth" = [])),
    params(
        ("school_id" = i32, Path, description = "School ID"),
        EquipmentQuery
    ),
    responses(
        (status = 200, description = "Equipment page", body = SchoolEquipmentPage),
        (status = 404, description = "School not found")
    )
)]
pub async fn list_school_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(school_id): Path<i32>,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<SchoolEquipmentPage>> {
    claims.require_ppd_admin()?;

    let school = state.services.schools.visible_by_id(&claims, school_id).await?;
    let (page, per_page, offset) = state.config.pagination.resolve(query.page, query.per_page);
    let (items, total) = state.services.equipment.list(&school, &query, per_page, offset).await?;

    Ok(Json(SchoolEquipmentPage {
        school,
        items,
        total,
        page,
        per_page,
    }))
}
