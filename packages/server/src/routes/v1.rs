use axum::{
    Router,
    routing::{get, patch},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/student", student_routes())
        .nest("/teacher", teacher_routes())
        .nest("/assignment", assignment_routes(config))
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::student::list_students).post(handlers::student::register_student),
        )
        .route(
            "/{id}",
            get(handlers::student::get_student).delete(handlers::student::delete_student),
        )
}

fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::teacher::list_teachers).post(handlers::teacher::register_teacher),
        )
        .route(
            "/{id}",
            get(handlers::teacher::get_teacher)
                .patch(handlers::teacher::update_teacher)
                .delete(handlers::teacher::delete_teacher),
        )
}

fn assignment_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::assignment::list_assignments)
                .post(handlers::assignment::submit_assignment),
        )
        .route(
            "/student/{name}",
            get(handlers::assignment::list_assignments_by_student),
        )
        .route("/{id}", get(handlers::assignment::get_assignment))
        .route("/{id}/comment", patch(handlers::assignment::add_comment))
        .route(
            "/{id}/file",
            get(handlers::assignment::download_assignment_file),
        )
        .layer(handlers::assignment::upload_body_limit(
            config.storage.max_file_size,
        ))
}
