use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::user::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Image,
    Video,
    Document,
    Carousel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadType {
    #[default]
    General,
    Seo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Draft,
    PendingReview,
    Approved,
    Rejected,
}

impl AssetStatus {
    /// Review flow: DRAFT -> PENDING_REVIEW -> APPROVED | REJECTED,
    /// with REJECTED -> PENDING_REVIEW on resubmission. Everything else
    /// is an invalid transition.
    pub fn can_transition_to(self, next: AssetStatus) -> bool {
        matches!(
            (self, next),
            (AssetStatus::Draft, AssetStatus::PendingReview)
                | (AssetStatus::PendingReview, AssetStatus::Approved)
                | (AssetStatus::PendingReview, AssetStatus::Rejected)
                | (AssetStatus::Rejected, AssetStatus::PendingReview)
        )
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStatus::Draft => write!(f, "DRAFT"),
            AssetStatus::PendingReview => write!(f, "PENDING_REVIEW"),
            AssetStatus::Approved => write!(f, "APPROVED"),
            AssetStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    UploaderOnly,
    AdminOnly,
    Company,
    Team,
    Role,
    SelectedUsers,
    Public,
}

impl Visibility {
    pub fn requires_allowed_role(self) -> bool {
        matches!(self, Visibility::Role)
    }

    /// allowed_role accompanies ROLE visibility and nothing else.
    pub fn accepts_allowed_role(self, allowed_role: Option<UserRole>) -> bool {
        self.requires_allowed_role() == allowed_role.is_some()
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::UploaderOnly => write!(f, "UPLOADER_ONLY"),
            Visibility::AdminOnly => write!(f, "ADMIN_ONLY"),
            Visibility::Company => write!(f, "COMPANY"),
            Visibility::Team => write!(f, "TEAM"),
            Visibility::Role => write!(f, "ROLE"),
            Visibility::SelectedUsers => write!(f, "SELECTED_USERS"),
            Visibility::Public => write!(f, "PUBLIC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,

    pub title: String,
    pub description: Option<String>,

    pub kind: AssetKind,
    pub upload_type: UploadType,
    pub status: AssetStatus,

    pub visibility: Visibility,
    // Set iff visibility == ROLE
    pub allowed_role: Option<UserRole>,

    pub company_id: Option<Uuid>,
    pub uploader_id: Uuid,

    // Mirror of the latest version's file
    pub file_key: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub current_version: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAsset {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub kind: AssetKind,
    pub upload_type: UploadType,
    pub visibility: Visibility,
    pub allowed_role: Option<UserRole>,
    pub company_id: Option<Uuid>,
    pub uploader_id: Uuid,

    #[validate(length(min = 1, max = 1024))]
    pub file_key: String,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    pub content_type: Option<String>,

    #[validate(range(min = 0))]
    pub size_bytes: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AssetUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Repository-level filter; visibility filtering happens in the evaluator,
/// never in SQL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    pub kind: Option<AssetKind>,
    pub upload_type: Option<UploadType>,
    pub uploader_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AssetVersion {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub version_number: i64,
    pub file_key: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAssetVersion {
    #[validate(length(min = 1, max = 1024))]
    pub file_key: String,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    pub content_type: Option<String>,

    #[validate(range(min = 0))]
    pub size_bytes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CarouselItem {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub position: i64,
    pub file_key: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCarouselItem {
    #[validate(length(min = 1, max = 1024))]
    pub file_key: String,

    #[validate(length(max = 500))]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AssetShare {
    pub asset_id: Uuid,
    pub user_id: Uuid,
    pub granted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AssetTeamShare {
    pub asset_id: Uuid,
    pub team_id: Uuid,
    pub granted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
