//! Student management (school admin) and the student dashboard

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::student::{Student, StudentDashboard, StudentForm, StudentQuery},
};

use super::{AuthenticatedUser, MessageResponse, PaginatedResponse};

/// Students of the caller's school
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    params(StudentQuery),
    responses(
        (status = 200, description = "Student page", body = PaginatedResponse<Student>)
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<PaginatedResponse<Student>>> {
    claims.require_school_admin()?;

    let school = state.services.schools.owned(&claims).await?;
    let (page, per_page, offset) = state.config.pagination.resolve(query.page, query.per_page);
    let (items, total) = state.services.students.list(&school, &query, per_page, offset).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Student>> {
    claims.require_school_admin()?;
    let school = state.services.schools.owned(&claims).await?;
    Ok(Json(state.services.students.get(&school, id).await?))
}

/// Register a student in the caller's school
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    request_body = StudentForm,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 409, description = "IC number already registered"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<StudentForm>,
) -> AppResult<(StatusCode, Json<Student>)> {
    claims.require_school_admin()?;
    let school = state.services.schools.owned(&claims).await?;
    let student = state.services.students.create(&school, form).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body = StudentForm,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(form): Json<StudentForm>,
) -> AppResult<Json<Student>> {
    claims.require_school_admin()?;
    let school = state.services.schools.owned(&claims).await?;
    Ok(Json(state.services.students.update(&school, id, form).await?))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    claims.require_school_admin()?;
    let school = state.services.schools.owned(&claims).await?;
    state.services.students.delete(&school, id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully.")))
}

/// Student landing page: own record, school and applications
#[utoipa::path(
    get,
    path = "/studentsPage",
    tag = "student",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = StudentDashboard),
        (status = 404, description = "No student record linked")
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StudentDashboard>> {
    claims.require_student()?;
    Ok(Json(state.services.students.dashboard(&claims).await?))
}
