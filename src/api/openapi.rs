//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, crews, equipment, health, lookups, schools, stats, students, users, versions};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TVPSS API",
        version = "1.0.0",
        description = "School TVPSS version tracking and equipment management REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Schools
        schools::list_all_schools,
        schools::create_school,
        schools::get_my_school,
        schools::update_my_school,
        schools::list_district_schools,
        schools::view_district_school,
        schools::list_state_schools,
        schools::view_state_school,
        schools::list_equipment_schools,
        schools::list_school_equipment,
        // TVPSS versions
        versions::ppd_approve,
        versions::ppd_reject,
        versions::state_approve,
        versions::state_reject,
        versions::get_my_version,
        versions::submit_my_version,
        // Equipment
        equipment::list_my_equipment,
        equipment::create_equipment,
        equipment::get_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::update_equipment_status,
        equipment::list_follow_ups,
        equipment::create_follow_up,
        // Lookups
        lookups::status_options,
        lookups::equipment_types,
        lookups::equipment_locations,
        // Students
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        students::dashboard,
        // Crews
        crews::apply,
        crews::results,
        crews::list_applications,
        crews::approve,
        crews::reject,
        // Stats
        stats::ppd_stats,
        stats::school_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::User,
            crate::models::user::UserQuery,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::enums::Role,
            // Schools and versions
            crate::models::school::School,
            crate::models::school::CreateSchool,
            crate::models::school::UpdateSchoolInfo,
            crate::models::school::SchoolStatusView,
            crate::models::school::SchoolList,
            crate::models::school::SchoolEquipmentCount,
            crate::models::school_version::SchoolVersion,
            crate::models::school_version::SubmitVersion,
            crate::models::school_version::CapabilityInfo,
            crate::models::school_version::TvpssView,
            crate::models::school_version::ReviewResponse,
            crate::models::enums::ApprovalStatus,
            schools::SchoolEquipmentPage,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentLocation,
            crate::models::equipment::EquipmentForm,
            crate::models::equipment::UpdateEquipmentStatus,
            crate::models::equipment::EquipmentQuery,
            crate::models::equipment::EquipmentDetail,
            crate::models::equipment::EquipmentResponse,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::EquipmentType,
            crate::models::follow_up::FollowUp,
            crate::models::follow_up::FollowUpAuthor,
            crate::models::follow_up::FollowUpResponse,
            equipment::FollowUpUpload,
            lookups::StatusOptions,
            // Students and crews
            crate::models::student::Student,
            crate::models::student::StudentForm,
            crate::models::student::StudentQuery,
            crate::models::student::StudentDashboard,
            crate::models::crew::Crew,
            crate::models::crew::CrewApplication,
            crate::models::crew::ApplyCrew,
            crate::models::crew::CrewQuery,
            crate::models::crew::CrewResponse,
            // Stats
            crate::models::stats::PpdStats,
            crate::models::stats::SchoolStats,
            crate::models::stats::StatusCount,
            // Common
            super::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "schools", description = "School onboarding"),
        (name = "school", description = "School admin: own school and TVPSS version"),
        (name = "ppd", description = "District (PPD) review and equipment oversight"),
        (name = "state", description = "State review"),
        (name = "equipment", description = "Equipment and follow-ups"),
        (name = "lookups", description = "Form option lists"),
        (name = "students", description = "Student management"),
        (name = "student", description = "Student dashboard and crew applications"),
        (name = "crews", description = "Crew application review"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
