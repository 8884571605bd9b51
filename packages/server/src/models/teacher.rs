use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::{validate_display_name, validate_email};

/// Request body for teacher registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterTeacherRequest {
    /// Display name (1-50 characters).
    #[schema(example = "Grace Hopper")]
    pub name: String,
    /// Unique email address.
    #[schema(example = "grace@example.com")]
    pub email: String,
}

pub fn validate_register_teacher(payload: &RegisterTeacherRequest) -> Result<(), AppError> {
    validate_display_name(&payload.name, "Teacher name")?;
    validate_email(&payload.email)?;
    Ok(())
}

/// Request body for a partial teacher update. Absent fields are left as-is.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateTeacherRequest {
    #[schema(example = "Grace Hopper")]
    pub name: Option<String>,
    #[schema(example = "grace.hopper@example.com")]
    pub email: Option<String>,
}

pub fn validate_update_teacher(payload: &UpdateTeacherRequest) -> Result<(), AppError> {
    if let Some(ref name) = payload.name {
        validate_display_name(name, "Teacher name")?;
    }
    if let Some(ref email) = payload.email {
        validate_email(email)?;
    }
    Ok(())
}

/// A registered teacher.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherResponse {
    /// Teacher ID (UUID).
    #[schema(example = "0d2ab9b7-63a2-4d0f-b1f2-2f4c89c7ee01")]
    pub id: String,
    #[schema(example = "Grace Hopper")]
    pub name: String,
    #[schema(example = "grace@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::teacher::Model> for TeacherResponse {
    fn from(model: crate::entity::teacher::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}
