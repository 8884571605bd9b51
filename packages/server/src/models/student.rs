use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::{validate_display_name, validate_email};

/// Request body for student registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterStudentRequest {
    /// Unique display name (1-50 characters).
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Unique email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

pub fn validate_register_student(payload: &RegisterStudentRequest) -> Result<(), AppError> {
    validate_display_name(&payload.name, "Student name")?;
    validate_email(&payload.email)?;
    Ok(())
}

/// A registered student.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    /// Student ID (UUID).
    #[schema(example = "8f67a1ce-97c4-4d31-9f86-7d12c0e5b1aa")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::student::Model> for StudentResponse {
    fn from(model: crate::entity::student::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}
