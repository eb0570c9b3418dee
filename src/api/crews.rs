//! Crew application endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        crew::{ApplyCrew, Crew, CrewApplication, CrewDecision, CrewQuery, CrewResponse},
        user::UserClaims,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Apply for a crew position
#[utoipa::path(
    post,
    path = "/applyCrew",
    tag = "student",
    security(("bearer_auth" = [])),
    request_body = ApplyCrew,
    responses(
        (status = 201, description = "Application submitted", body = CrewResponse),
        (status = 409, description = "A pending application already exists")
    )
)]
pub async fn apply(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<ApplyCrew>,
) -> AppResult<(StatusCode, Json<CrewResponse>)> {
    claims.require_student()?;

    let student = state.services.students.own_record(&claims).await?;
    let crew = state.services.crews.apply(&student, data).await?;
    Ok((
        StatusCode::CREATED,
        Json(CrewResponse {
            message: "Crew application submitted.".to_string(),
            crew,
        }),
    ))
}

/// Own applications and their outcome
#[utoipa::path(
    get,
    path = "/resultApply",
    tag = "student",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Applications", body = Vec<Crew>)
    )
)]
pub async fn results(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Crew>>> {
    claims.require_student()?;

    let student = state.services.students.own_record(&claims).await?;
    Ok(Json(state.services.crews.results(&student).await?))
}

/// Applications from the caller's students
#[utoipa::path(
    get,
    path = "/crew-applications",
    tag = "crews",
    security(("bearer_auth" = [])),
    params(CrewQuery),
    responses(
        (status = 200, description = "Applications", body = Vec<CrewApplication>)
    )
)]
pub async fn list_applications(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<CrewQuery>,
) -> AppResult<Json<Vec<CrewApplication>>> {
    claims.require_school_admin()?;

    let school = state.services.schools.owned(&claims).await?;
    Ok(Json(state.services.crews.list_for_school(&school, &query).await?))
}

async fn decide(
    state: &AppState,
    claims: &UserClaims,
    id: i32,
    decision: CrewDecision,
) -> AppResult<Json<CrewResponse>> {
    claims.require_school_admin()?;

    let school = state.services.schools.owned(claims).await?;
    let crew = state.services.crews.decide(&school, id, decision).await?;
    Ok(Json(CrewResponse {
        message: decision.message().to_string(),
        crew,
    }))
}

#[utoipa::path(
    post,
    path = "/crew-applications/{id}/approve",
    tag = "crews",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Crew application ID")
    ),
    responses(
        (status = 200, description = "Application approved", body = CrewResponse),
        (status = 404, description = "Application not found"),
        (status = 422, description = "Application already decided", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CrewResponse>> {
    decide(&state, &claims, id, CrewDecision::Approve).await
}

#[utoipa::path(
    post,
    path = "/crew-applications/{id}/reject",
    tag = "crews",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Crew application ID")
    ),
    responses(
        (status = 200, description = "Application rejected", body = CrewResponse),
        (status = 404, description = "Application not found"),
        (status = 422, description = "Application already decided", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CrewResponse>> {
    decide(&state, &claims, id, CrewDecision::Reject).await
}
