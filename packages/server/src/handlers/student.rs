use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::storage::BlobStore;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{assignment, student};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::normalize_email;
use crate::models::student::{RegisterStudentRequest, StudentResponse, validate_register_student};
use crate::state::AppState;

/// Find a student by ID or return 404.
async fn find_student<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<student::Model, AppError> {
    student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student with ID {id} not found")))
}

/// Register a new student.
#[utoipa::path(
    post,
    path = "/api/v1/student",
    tag = "Students",
    operation_id = "registerStudent",
    summary = "Register a student",
    request_body = RegisterStudentRequest,
    responses(
        (status = 201, description = "Student registered", body = StudentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Name or email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn register_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_student(&payload)?;

    let name = payload.name.trim().to_string();
    let email = normalize_email(&payload.email);

    if student::Entity::find()
        .filter(student::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Student with email {email} already exists"
        )));
    }
    if student::Entity::find()
        .filter(student::Column::Name.eq(&name))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Student '{name}' is already registered"
        )));
    }

    let new_student = student::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_student.insert(&state.db).await.map_err(|e| {
        match e.sql_err() {
            // Concurrent registration can slip past the pre-checks; the
            // unique constraints are the source of truth.
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Student name or email already registered".into())
            }
            _ => AppError::from(e),
        }
    })?;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(model))))
}

/// List all registered students.
#[utoipa::path(
    get,
    path = "/api/v1/student",
    tag = "Students",
    operation_id = "listStudents",
    summary = "List all students",
    responses(
        (status = 200, description = "Student list", body = Vec<StudentResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let students = student::Entity::find()
        .order_by_asc(student::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        students.into_iter().map(StudentResponse::from).collect(),
    ))
}

/// Get a single student by ID.
#[utoipa::path(
    get,
    path = "/api/v1/student/{id}",
    tag = "Students",
    operation_id = "getStudent",
    summary = "Get a student by ID",
    params(("id" = String, Path, description = "Student ID (UUID)")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>, AppError> {
    let model = find_student(&state.db, id).await?;
    Ok(Json(StudentResponse::from(model)))
}

/// Delete a student, their assignment records, and their stored files.
#[utoipa::path(
    delete,
    path = "/api/v1/student/{id}",
    tag = "Students",
    operation_id = "deleteStudent",
    summary = "Delete a student",
    description = "Deletes the student and cascades to their assignments; the assignments' \
        stored files are removed best-effort afterwards.",
    params(("id" = String, Path, description = "Student ID (UUID)")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let _student = find_student(&txn, id).await?;

    let stored_filenames: Vec<String> = assignment::Entity::find()
        .filter(assignment::Column::StudentId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|a| a.stored_filename)
        .collect();

    assignment::Entity::delete_many()
        .filter(assignment::Column::StudentId.eq(id))
        .exec(&txn)
        .await?;
    student::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    // Orphan blobs are harmless garbage; a failed delete is logged, not
    // surfaced.
    for stored_filename in &stored_filenames {
        match state.blob_store.delete(stored_filename).await {
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    stored_filename,
                    error = %e,
                    "Failed to delete blob for removed student"
                );
            }
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
