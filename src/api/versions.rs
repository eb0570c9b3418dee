//! TVPSS version endpoints: district and state review, school submission

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        school_version::{ReviewAction, ReviewResponse, SubmitVersion, TvpssView},
        user::UserClaims,
    },
    AppState,
};

use super::AuthenticatedUser;

async fn review(
    state: &AppState,
    claims: &UserClaims,
    code: &str,
    action: ReviewAction,
) -> AppResult<Json<ReviewResponse>> {
    let school = state.services.schools.visible_by_code(claims, code).await?;
    let school_version = state.services.versions.review(&school, action).await?;
    Ok(Json(ReviewResponse {
        message: action.message().to_string(),
        school_version,
    }))
}

/// District approval; the version then waits for the state decision
#[utoipa::path(
    post,
    path = "/ppd/schools/{code}/approve",
    tag = "ppd",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "Version approved by district", body = ReviewResponse),
        (status = 404, description = "School or version not found")
    )
)]
pub async fn ppd_approve(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(code): Path<String>,
) -> AppResult<Json<ReviewResponse>> {
    claims.require_ppd_admin()?;
    review(&state, &claims, &code, ReviewAction::PpdApprove).await
}

/// District rejection
#[utoipa::path(
    post,
    path = "/ppd/schools/{code}/reject",
    tag = "ppd",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "Version rejected", body = ReviewResponse),
        (status = 404, description = "School or version not found")
    )
)]
pub async fn ppd_reject(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(code): Path<String>,
) -> AppResult<Json<ReviewResponse>> {
    claims.require_ppd_admin()?;
    review(&state, &claims, &code, ReviewAction::PpdReject).await
}

/// Final approval by the state
#[utoipa::path(
    post,
    path = "/state/schools/{code}/approve",
    tag = "state",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "Version approved", body = ReviewResponse),
        (status = 404, description = "School or version not found"),
        (status = 422, description = "Not approved by PPD yet", body = crate::error::ErrorResponse)
    )
)]
pub async fn state_approve(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(code): Path<String>,
) -> AppResult<Json<ReviewResponse>> {
    claims.require_state_admin()?;
    review(&state, &claims, &code, ReviewAction::StateApprove).await
}

/// Rejection by the state
#[utoipa::path(
    post,
    path = "/state/schools/{code}/reject",
    tag = "state",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "School code")
    ),
    responses(
        (status = 200, description = "Version rejected", body = ReviewResponse),
        (status = 404, description = "School or version not found")
    )
)]
pub async fn state_reject(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(code): Path<String>,
) -> AppResult<Json<ReviewResponse>> {
    claims.require_state_admin()?;
    review(&state, &claims, &code, ReviewAction::StateReject).await
}

/// Own school's version with the next-version suggestion
#[utoipa::path(
    get,
    path = "/school/version",
    tag = "school",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own TVPSS version", body = TvpssView),
        (status = 404, description = "No school assigned")
    )
)]
pub async fn get_my_version(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<TvpssView>> {
    claims.require_school_admin()?;
    let school = state.services.schools.owned(&claims).await?;
    Ok(Json(state.services.versions.view(&school).await?))
}

/// Submit a new version for review
#[utoipa::path(
    put,
    path = "/school/version",
    tag = "school",
    security(("bearer_auth" = [])),
    request_body = SubmitVersion,
    responses(
        (status = 200, description = "Version submitted", body = TvpssView),
        (status = 422, description = "Version out of range or lower than current", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_my_version(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<SubmitVersion>,
) -> AppResult<Json<TvpssView>> {
    claims.require_school_admin()?;
    let school = state.services.schools.owned(&claims).await?;
    Ok(Json(state.services.versions.submit(&school, data).await?))
}
