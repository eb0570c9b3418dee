//! Equipment endpoints and follow-up threads

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{multipart::MultipartError, Multipart, WithRejection};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        equipment::{
            Equipment, EquipmentDetail, EquipmentForm, EquipmentQuery, EquipmentResponse,
            UpdateEquipmentStatus,
        },
        follow_up::{client_file_name, FollowUp, FollowUpResponse, NewFollowUp, UploadedImage},
    },
};

use super::{AuthenticatedUser, MessageResponse, PaginatedResponse};

const SCHOOL_OR_PPD: &[Role] = &[Role::SchoolAdmin, Role::PpdAdmin];

/// Multipart body of a follow-up submission
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct FollowUpUpload {
    /// Note text, at most 500 characters
    content: Option<String>,
    /// Up to two jpeg/png images
    #[schema(value_type = Vec<String>, format = Binary)]
    images: Vec<Vec<u8>>,
}

/// List equipment of the caller's school
#[utoipa::path(
    get,
    path = "/school/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment page", body = PaginatedResponse<Equipment>),
        (status = 404, description = "No school assigned")
    )
)]
pub async fn list_my_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<PaginatedResponse<Equipment>>> {
    claims.require_school_admin()?;

    let school = state.services.schools.owned(&claims).await?;
    let (page, per_page, offset) = state.config.pagination.resolve(query.page, query.per_page);
    let (items, total) = state.services.equipment.list(&school, &query, per_page, offset).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Register equipment for the caller's school
#[utoipa::path(
    post,
    path = "/school/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = EquipmentForm,
    responses(
        (status = 201, description = "Equipment created", body = EquipmentResponse),
        (status = 400, description = "Unknown type or status label", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Json(form), _): WithRejection<Json<EquipmentForm>, AppError>,
) -> AppResult<(StatusCode, Json<EquipmentResponse>)> {
    claims.require_school_admin()?;

    let school = state.services.schools.owned(&claims).await?;
    let equipment = state.services.equipment.create(&school, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(EquipmentResponse {
            message: "Equipment successfully added!".to_string(),
            equipment,
        }),
    ))
}

/// Equipment with its follow-up thread
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentDetail),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentDetail>> {
    claims.require_role(SCHOOL_OR_PPD)?;
    Ok(Json(state.services.equipment.detail(&claims, id).await?))
}

/// Replace equipment fields
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID")
    ),
    request_body = EquipmentForm,
    responses(
        (status = 200, description = "Equipment updated", body = EquipmentResponse),
        (status = 400, description = "Unknown type or status label", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    WithRejection(Json(form), _): WithRejection<Json<EquipmentForm>, AppError>,
) -> AppResult<Json<EquipmentResponse>> {
    claims.require_school_admin()?;

    let equipment = state.services.equipment.update(&claims, id, form).await?;
    Ok(Json(EquipmentResponse {
        message: "Equipment updated successfully.".to_string(),
        equipment,
    }))
}

/// Delete equipment and its follow-ups
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Equipment deleted", body = MessageResponse),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    claims.require_role(SCHOOL_OR_PPD)?;

    state.services.equipment.delete(&claims, id).await?;
    Ok(Json(MessageResponse::new("Equipment deleted successfully.")))
}

/// Change the equipment status
#[utoipa::path(
    put,
    path = "/equipment/{id}/status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID")
    ),
    request_body = UpdateEquipmentStatus,
    responses(
        (status = 200, description = "Status updated", body = EquipmentResponse),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Unknown status", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    WithRejection(Json(data), _): WithRejection<Json<UpdateEquipmentStatus>, AppError>,
) -> AppResult<Json<EquipmentResponse>> {
    claims.require_role(SCHOOL_OR_PPD)?;

    let equipment = state.services.equipment.update_status(&claims, id, &data).await?;
    Ok(Json(EquipmentResponse {
        message: "Equipment status updated successfully.".to_string(),
        equipment,
    }))
}

/// Follow-up thread of an equipment record, newest first
#[utoipa::path(
    get,
    path = "/equipment/{id}/follow-ups",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Follow-ups", body = Vec<FollowUp>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn list_follow_ups(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<FollowUp>>> {
    claims.require_role(SCHOOL_OR_PPD)?;
    Ok(Json(state.services.equipment.follow_ups(&claims, id).await?))
}

/// Add a follow-up with optional images
#[utoipa::path(
    post,
    path = "/equipment/{id}/follow-ups",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Equipment ID")
    ),
    request_body(content = FollowUpUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Follow-up saved", body = FollowUpResponse),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Invalid upload or status not eligible", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_follow_up(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<FollowUpResponse>)> {
    claims.require_role(SCHOOL_OR_PPD)?;

    let data = read_follow_up(multipart).await?;
    let follow_up = state.services.equipment.create_follow_up(&claims, id, data).await?;
    Ok((
        StatusCode::CREATED,
        Json(FollowUpResponse {
            message: "Follow-up successfully saved!".to_string(),
            follow_up,
        }),
    ))
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", e))
}

/// Collect the `content` field and every `images`/`images[]` file part
async fn read_follow_up(mut multipart: Multipart) -> AppResult<NewFollowUp> {
    let mut data = NewFollowUp::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("content") => {
                data.content = Some(field.text().await.map_err(bad_multipart)?);
            }
            Some("images") | Some("images[]") => {
                let file_name = field.file_name().map(client_file_name).unwrap_or_default();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                data.images.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::post, Router};
    use tower::ServiceExt;

    async fn accept_form(
        WithRejection(Json(form), _): WithRejection<Json<EquipmentForm>, AppError>,
    ) -> AppResult<StatusCode> {
        form.normalized()?;
        Ok(StatusCode::NO_CONTENT)
    }

    async fn post_form(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/", post(accept_form));
        let response = app
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn form(equipment_type: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "name": "Kamera Sony",
            "equipment_type": equipment_type,
            "location": "Bilik Studio",
            "acquired_date": "2024-01-15",
            "status": status
        })
    }

    #[tokio::test]
    async fn test_unknown_status_label_uses_error_body() {
        let (status, body) = post_form(form("Laptop", "Rosak")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadValue");
        assert!(body["message"].as_str().unwrap().contains("Rosak"));
    }

    #[tokio::test]
    async fn test_unknown_type_label_uses_error_body() {
        let (status, body) = post_form(form("Drone", "Berfungsi")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 6);
    }

    #[tokio::test]
    async fn test_valid_form_accepted() {
        let (status, _) = post_form(form("Laptop", "Berfungsi")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
