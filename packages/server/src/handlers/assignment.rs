use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use common::storage::{ALLOWED_EXTENSIONS, BlobStore, StorageError};
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{assignment, student};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::assignment::{
    AddCommentRequest, AssignmentView, validate_comment, validate_description, validate_subject,
};
use crate::state::AppState;
use crate::utils::filename::file_extension;

/// Body limit for assignment uploads: the file maximum plus headroom for the
/// other form fields. Oversized files inside the limit get the specific
/// FILE_TOO_LARGE response from the size check.
pub fn upload_body_limit(max_file_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_file_size as usize + 64 * 1024)
}

/// Find a student by display name or return 404.
async fn find_student_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<student::Model, AppError> {
    student::Entity::find()
        .filter(student::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student '{name}' not found")))
}

/// Find an assignment by ID or return 404.
async fn find_assignment<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<assignment::Model, AppError> {
    assignment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".into()))
}

/// Resolve the owning student's name for a single assignment.
async fn owner_name<C: ConnectionTrait>(db: &C, student_id: Uuid) -> Result<String, AppError> {
    let owner = student::Entity::find_by_id(student_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Assignment owner {student_id} missing")))?;
    Ok(owner.name)
}

/// Write the blob, then record the assignment.
///
/// The two writes cannot share a transaction, so a failed insert deletes the
/// just-written blob (best effort) before the insert failure is reported.
/// A crash between the two steps can still leave an orphan blob; those are
/// never reachable through the ledger.
pub(crate) async fn store_and_record(
    db: &DatabaseConnection,
    blob_store: &dyn BlobStore,
    student_id: Uuid,
    student_name: &str,
    subject: &str,
    description: Option<String>,
    extension: &str,
    data: &[u8],
) -> Result<assignment::Model, AppError> {
    let stored_filename = blob_store.store(student_name, data, extension).await?;

    let record = assignment::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student_id),
        subject: Set(subject.to_string()),
        description: Set(description),
        stored_filename: Set(stored_filename.clone()),
        teacher_comment: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match record.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) => {
            if let Err(del_err) = blob_store.delete(&stored_filename).await {
                tracing::error!(
                    stored_filename,
                    error = %del_err,
                    "Failed to remove blob after ledger insert failure"
                );
            }
            Err(AppError::from(e))
        }
    }
}

/// Parsed multipart form for an assignment submission.
///
/// The file stays optional here; its presence is only checked after the
/// student has been resolved, so an unregistered name is a 404 even when the
/// file is missing too.
struct SubmissionForm {
    student_name: String,
    subject: String,
    description: Option<String>,
    file: Option<(String, axum::body::Bytes)>,
}

async fn read_submission_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut student_name: Option<String> = None;
    let mut subject: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("name") => {
                student_name = Some(read_text_field(field, "name").await?);
            }
            Some("subject") => {
                subject = Some(read_text_field(field, "subject").await?);
            }
            Some("description") => {
                description = Some(read_text_field(field, "description").await?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
                file = Some((file_name, bytes));
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let student_name = student_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Student name is required".into()))?;

    let subject = subject.ok_or_else(|| AppError::Validation("Subject is required".into()))?;
    validate_subject(&subject)?;
    let subject = subject.trim().to_string();

    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(ref d) = description {
        validate_description(d)?;
    }

    Ok(SubmissionForm {
        student_name,
        subject,
        description,
        file,
    })
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}' field: {e}")))
}

/// Submit an assignment file for a registered student.
#[utoipa::path(
    post,
    path = "/api/v1/assignment",
    tag = "Assignments",
    operation_id = "submitAssignment",
    summary = "Submit an assignment",
    description = "Accepts a multipart form with `name` (the student's registered name), \
        `subject`, an optional `description`, and a `file`. The file is stored under a \
        server-generated name; only the extension of the upload name is kept.",
    request_body(content_type = "multipart/form-data", description = "Assignment form with file"),
    responses(
        (status = 201, description = "Assignment recorded", body = AssignmentView),
        (status = 400, description = "Missing/empty file, unsupported type, or oversized file \
            (VALIDATION_ERROR, UNSUPPORTED_FILE_TYPE, FILE_TOO_LARGE)", body = ErrorBody),
        (status = 404, description = "Student not registered (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn submit_assignment(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_submission_form(multipart).await?;

    // A submission never creates an implicit student.
    let owner = find_student_by_name(&state.db, &form.student_name).await?;

    let (file_name, file_bytes) = form
        .file
        .ok_or_else(|| AppError::Validation("File is required".into()))?;
    if file_bytes.is_empty() {
        return Err(AppError::Validation("File is required".into()));
    }

    let extension = file_extension(&file_name)
        .ok_or_else(|| AppError::unsupported_extension(file_name.trim()))?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::unsupported_extension(&extension));
    }

    let max_file_size = state.config.storage.max_file_size;
    if file_bytes.len() as u64 > max_file_size {
        return Err(AppError::file_too_large(max_file_size));
    }

    let model = store_and_record(
        &state.db,
        state.blob_store.as_ref(),
        owner.id,
        &owner.name,
        &form.subject,
        form.description,
        &extension,
        &file_bytes,
    )
    .await?;

    tracing::info!(assignment_id = %model.id, student = %owner.name, "Assignment submitted");

    Ok((
        StatusCode::CREATED,
        Json(AssignmentView::from_parts(model, owner.name)),
    ))
}

/// List every assignment with its owning student's name.
#[utoipa::path(
    get,
    path = "/api/v1/assignment",
    tag = "Assignments",
    operation_id = "listAssignments",
    summary = "List all assignments",
    responses(
        (status = 200, description = "All assignments", body = Vec<AssignmentView>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    let rows = assignment::Entity::find()
        .find_also_related(student::Entity)
        .order_by_asc(assignment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut views = Vec::with_capacity(rows.len());
    for (model, owner) in rows {
        let owner = owner
            .ok_or_else(|| AppError::Internal(format!("Assignment owner {} missing", model.student_id)))?;
        views.push(AssignmentView::from_parts(model, owner.name));
    }

    Ok(Json(views))
}

/// List a student's assignments by display name.
#[utoipa::path(
    get,
    path = "/api/v1/assignment/student/{name}",
    tag = "Assignments",
    operation_id = "listAssignmentsByStudent",
    summary = "List assignments for a student",
    description = "Returns the student's assignments, oldest first. A registered student with \
        no submissions yields an empty list, not an error.",
    params(("name" = String, Path, description = "Student display name")),
    responses(
        (status = 200, description = "The student's assignments", body = Vec<AssignmentView>),
        (status = 404, description = "Student not registered (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(name = %name))]
pub async fn list_assignments_by_student(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    let owner = find_student_by_name(&state.db, &name).await?;

    let rows = assignment::Entity::find()
        .filter(assignment::Column::StudentId.eq(owner.id))
        .order_by_asc(assignment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|model| AssignmentView::from_parts(model, owner.name.clone()))
            .collect(),
    ))
}

/// Get a single assignment by ID.
#[utoipa::path(
    get,
    path = "/api/v1/assignment/{id}",
    tag = "Assignments",
    operation_id = "getAssignment",
    summary = "Get an assignment by ID",
    params(("id" = String, Path, description = "Assignment ID (UUID)")),
    responses(
        (status = 200, description = "Assignment details", body = AssignmentView),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentView>, AppError> {
    let model = find_assignment(&state.db, id).await?;
    let student_name = owner_name(&state.db, model.student_id).await?;
    Ok(Json(AssignmentView::from_parts(model, student_name)))
}

/// Attach or replace the teacher comment on an assignment.
#[utoipa::path(
    patch,
    path = "/api/v1/assignment/{id}/comment",
    tag = "Assignments",
    operation_id = "addComment",
    summary = "Add a teacher comment",
    params(("id" = String, Path, description = "Assignment ID (UUID)")),
    request_body = AddCommentRequest,
    responses(
        (status = 200, description = "Comment recorded", body = AssignmentView),
        (status = 400, description = "Blank comment (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = %id))]
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<AddCommentRequest>,
) -> Result<Json<AssignmentView>, AppError> {
    let comment = validate_comment(&payload.comment)?;

    let existing = find_assignment(&state.db, id).await?;

    let mut active: assignment::ActiveModel = existing.into();
    active.teacher_comment = Set(Some(comment));
    let model = active.update(&state.db).await?;

    let student_name = owner_name(&state.db, model.student_id).await?;

    tracing::info!(assignment_id = %id, "Teacher comment recorded");

    Ok(Json(AssignmentView::from_parts(model, student_name)))
}

/// Download the stored file for an assignment.
#[utoipa::path(
    get,
    path = "/api/v1/assignment/{id}/file",
    tag = "Assignments",
    operation_id = "downloadAssignmentFile",
    summary = "Download an assignment file",
    description = "Streams the stored file. 404 if the assignment is unknown, or if the record \
        exists but its file is missing from storage.",
    params(("id" = String, Path, description = "Assignment ID (UUID)")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "Assignment or file not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn download_assignment_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let model = find_assignment(&state.db, id).await?;

    // Distinguish a ledger record whose blob has gone missing from an
    // unknown assignment.
    let missing_blob = |e: StorageError| match e {
        StorageError::NotFound(_) => {
            tracing::warn!(
                assignment_id = %id,
                stored_filename = %model.stored_filename,
                "Assignment record exists but blob is missing"
            );
            AppError::NotFound("Assignment file is missing from storage".into())
        }
        other => AppError::from(other),
    };

    let size = state
        .blob_store
        .size(&model.stored_filename)
        .await
        .map_err(missing_blob)?;
    let reader = state
        .blob_store
        .get_stream(&model.stored_filename)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => {
                AppError::NotFound("Assignment file is missing from storage".into())
            }
            other => AppError::from(other),
        })?;

    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(&model.stored_filename)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&model.stored_filename),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Build a safe `Content-Disposition` header value. Stored filenames are
/// ASCII-safe by construction; this guards against a corrupted record.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    format!("attachment; filename=\"{name}\"")
}
