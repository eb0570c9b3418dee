//! Dashboard statistics endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::stats::{PpdStats, SchoolStats},
};

use super::AuthenticatedUser;

/// PPD dashboard counters
#[utoipa::path(
    get,
    path = "/ppd/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counters, all zero without an owned school", body = PpdStats)
    )
)]
pub async fn ppd_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<PpdStats>> {
    claims.require_ppd_admin()?;
    Ok(Json(state.services.stats.ppd(&claims).await?))
}

/// School dashboard counters
#[utoipa::path(
    get,
    path = "/school/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counters of the own school", body = SchoolStats)
    )
)]
pub async fn school_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SchoolStats>> {
    claims.require_school_admin()?;
    Ok(Json(state.services.stats.school(&claims).await?))
}
