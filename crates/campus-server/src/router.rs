//! Axum router construction.
//!
//! Builds the full application router with all route groups, middleware
//! layers, and the OpenAPI documentation UI.

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::students::create_student,
        routes::students::get_student,
        routes::students::update_student,
        routes::students::delete_student,
        routes::students::list_students,
        routes::students::get_student_faculty,
        routes::students::student_faculty_by_name,
        routes::students::count_students,
        routes::students::average_age,
        routes::students::last_enrolled,
        routes::students::student_names,
        routes::faculties::create_faculty,
        routes::faculties::get_faculty,
        routes::faculties::update_faculty,
        routes::faculties::delete_faculty,
        routes::faculties::list_faculties,
        routes::faculties::faculty_students,
        routes::avatars::upload_avatar,
        routes::avatars::serve_avatar,
        routes::avatars::serve_avatar_file,
        routes::avatars::list_avatars,
    ),
    components(schemas(
        routes::students::StudentResponse,
        routes::students::StudentRequest,
        routes::students::CountResponse,
        routes::students::AverageAgeResponse,
        routes::faculties::FacultyResponse,
        routes::faculties::FacultyRequest,
        routes::avatars::AvatarResponse,
        routes::avatars::AvatarListEntry,
    ))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Students
        .route("/students", post(routes::students::create_student))
        .route("/students", get(routes::students::list_students))
        .route(
            "/students/{id}",
            get(routes::students::get_student)
                .put(routes::students::update_student)
                .delete(routes::students::delete_student),
        )
        .route(
            "/students/{id}/faculty",
            get(routes::students::get_student_faculty),
        )
        .route(
            "/students/by-name/{name}/faculty",
            get(routes::students::student_faculty_by_name),
        )
        .route("/students/stats/count", get(routes::students::count_students))
        .route(
            "/students/stats/average-age",
            get(routes::students::average_age),
        )
        .route(
            "/students/stats/last-enrolled",
            get(routes::students::last_enrolled),
        )
        .route("/students/names", get(routes::students::student_names))
        // Faculties
        .route("/faculties", post(routes::faculties::create_faculty))
        .route("/faculties", get(routes::faculties::list_faculties))
        .route(
            "/faculties/{id}",
            get(routes::faculties::get_faculty)
                .put(routes::faculties::update_faculty)
                .delete(routes::faculties::delete_faculty),
        )
        .route(
            "/faculties/{id}/students",
            get(routes::faculties::faculty_students),
        )
        // Avatars
        .route(
            "/students/{id}/avatar",
            post(routes::avatars::upload_avatar).get(routes::avatars::serve_avatar),
        )
        .route(
            "/students/{id}/avatar/file",
            get(routes::avatars::serve_avatar_file),
        )
        .route("/avatars", get(routes::avatars::list_avatars));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// GET /health
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
