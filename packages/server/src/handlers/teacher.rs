use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::teacher;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::normalize_email;
use crate::models::teacher::{
    RegisterTeacherRequest, TeacherResponse, UpdateTeacherRequest, validate_register_teacher,
    validate_update_teacher,
};
use crate::state::AppState;

/// Find a teacher by ID or return 404.
async fn find_teacher<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<teacher::Model, AppError> {
    teacher::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Teacher with ID {id} not found")))
}

/// Register a new teacher.
#[utoipa::path(
    post,
    path = "/api/v1/teacher",
    tag = "Teachers",
    operation_id = "registerTeacher",
    summary = "Register a teacher",
    request_body = RegisterTeacherRequest,
    responses(
        (status = 201, description = "Teacher registered", body = TeacherResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn register_teacher(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterTeacherRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_teacher(&payload)?;

    let email = normalize_email(&payload.email);

    if teacher::Entity::find()
        .filter(teacher::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Teacher with email {email} already exists"
        )));
    }

    let new_teacher = teacher::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_teacher
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Teacher email already registered".into())
            }
            _ => AppError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(TeacherResponse::from(model))))
}

/// List all registered teachers.
#[utoipa::path(
    get,
    path = "/api/v1/teacher",
    tag = "Teachers",
    operation_id = "listTeachers",
    summary = "List all teachers",
    responses(
        (status = 200, description = "Teacher list", body = Vec<TeacherResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_teachers(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherResponse>>, AppError> {
    let teachers = teacher::Entity::find()
        .order_by_asc(teacher::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        teachers.into_iter().map(TeacherResponse::from).collect(),
    ))
}

/// Get a single teacher by ID.
#[utoipa::path(
    get,
    path = "/api/v1/teacher/{id}",
    tag = "Teachers",
    operation_id = "getTeacher",
    summary = "Get a teacher by ID",
    params(("id" = String, Path, description = "Teacher ID (UUID)")),
    responses(
        (status = 200, description = "Teacher details", body = TeacherResponse),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherResponse>, AppError> {
    let model = find_teacher(&state.db, id).await?;
    Ok(Json(TeacherResponse::from(model)))
}

/// Update a teacher, merging only the supplied fields.
#[utoipa::path(
    patch,
    path = "/api/v1/teacher/{id}",
    tag = "Teachers",
    operation_id = "updateTeacher",
    summary = "Update a teacher",
    params(("id" = String, Path, description = "Teacher ID (UUID)")),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Email taken by another teacher (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = %id))]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateTeacherRequest>,
) -> Result<Json<TeacherResponse>, AppError> {
    validate_update_teacher(&payload)?;

    if payload == UpdateTeacherRequest::default() {
        let existing = find_teacher(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_teacher(&txn, id).await?;
    let mut active: teacher::ActiveModel = existing.clone().into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref email) = payload.email {
        let email = normalize_email(email);
        if email != existing.email {
            let taken = teacher::Entity::find()
                .filter(teacher::Column::Email.eq(&email))
                .filter(teacher::Column::Id.ne(id))
                .one(&txn)
                .await?
                .is_some();
            if taken {
                return Err(AppError::Conflict(format!(
                    "Email {email} is already taken by another teacher"
                )));
            }
        }
        active.email = Set(email);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(TeacherResponse::from(model)))
}

/// Delete a teacher.
#[utoipa::path(
    delete,
    path = "/api/v1/teacher/{id}",
    tag = "Teachers",
    operation_id = "deleteTeacher",
    summary = "Delete a teacher",
    params(("id" = String, Path, description = "Teacher ID (UUID)")),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let _teacher = find_teacher(&txn, id).await?;
    teacher::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
