use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignment")]
pub struct Model {
    /// Server-generated UUIDv4; never reused.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub subject: String,
    pub description: Option<String>,

    /// Name the blob lives under in the content directory. Generated by the
    /// blob store; shares only the extension with the upload filename.
    #[sea_orm(unique)]
    pub stored_filename: String,

    pub teacher_comment: Option<String>,

    pub student_id: Uuid,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
