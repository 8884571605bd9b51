pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coursework Submission API",
        version = "1.0.0",
        description = "API for registering students and teachers, submitting assignment files, and reviewing submissions"
    ),
    paths(
        handlers::student::register_student,
        handlers::student::list_students,
        handlers::student::get_student,
        handlers::student::delete_student,
        handlers::teacher::register_teacher,
        handlers::teacher::list_teachers,
        handlers::teacher::get_teacher,
        handlers::teacher::update_teacher,
        handlers::teacher::delete_teacher,
        handlers::assignment::submit_assignment,
        handlers::assignment::list_assignments,
        handlers::assignment::list_assignments_by_student,
        handlers::assignment::get_assignment,
        handlers::assignment::add_comment,
        handlers::assignment::download_assignment_file,
    ),
    tags(
        (name = "Students", description = "Student registration and lookup"),
        (name = "Teachers", description = "Teacher registration and management"),
        (name = "Assignments", description = "Assignment submission, review, and download"),
    ),
)]
struct ApiDoc;

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors
        .allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(config.server.cors.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = ApiDoc::openapi();
    let cors = cors_layer(&state.config);

    axum::Router::new()
        .nest("/api", routes::api_routes(&state.config))
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}
