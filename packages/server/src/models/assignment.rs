use serde::{Deserialize, Serialize};

use crate::entity::assignment;
use crate::error::AppError;

/// Read-facing projection of an assignment joined with the owning student's
/// display name.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignmentView {
    /// Assignment ID (UUID).
    #[schema(example = "4f0c2e9e-2b1f-47a6-8f0e-6a1d9b3c5e77")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub student_name: String,
    #[schema(example = "Math")]
    pub subject: String,
    #[schema(example = "Week 3 problem set")]
    pub description: Option<String>,
    /// Stored filename; shares only the extension with the upload name.
    #[schema(example = "Ada-Lovelace-8c2d9e4a-1b3f-4c5d-9e8f-7a6b5c4d3e2f.pdf")]
    pub filename: String,
    #[schema(example = "Good work")]
    pub comment: Option<String>,
}

impl AssignmentView {
    pub fn from_parts(model: assignment::Model, student_name: String) -> Self {
        Self {
            id: model.id.to_string(),
            student_name,
            subject: model.subject,
            description: model.description,
            filename: model.stored_filename,
            comment: model.teacher_comment,
        }
    }
}

/// Request body for attaching a teacher comment.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddCommentRequest {
    #[schema(example = "Good work")]
    pub comment: String,
}

/// Trim a comment and reject blank or overlong ones.
pub fn validate_comment(comment: &str) -> Result<String, AppError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Comment must not be empty".into()));
    }
    if trimmed.chars().count() > 2000 {
        return Err(AppError::Validation(
            "Comment must be at most 2000 characters".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate the subject form field (1-100 characters after trim).
pub fn validate_subject(subject: &str) -> Result<(), AppError> {
    let subject = subject.trim();
    if subject.is_empty() || subject.chars().count() > 100 {
        return Err(AppError::Validation(
            "Subject must be 1-100 characters".into(),
        ));
    }
    Ok(())
}

/// Validate the optional description form field (at most 1000 characters).
pub fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > 1000 {
        return Err(AppError::Validation(
            "Description must be at most 1000 characters".into(),
        ));
    }
    Ok(())
}
