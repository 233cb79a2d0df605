use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    ContentCreator,
    SeoSpecialist,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::ContentCreator => write!(f, "CONTENT_CREATOR"),
            UserRole::SeoSpecialist => write!(f, "SEO_SPECIALIST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,

    pub email: String,
    pub display_name: Option<String>,

    pub role: UserRole,

    // Optional company membership (NULL for users outside any company)
    pub company_id: Option<Uuid>,

    // Account gate: not activated yet vs. administratively deactivated.
    // A deactivated user keeps its audit history but loses every grant.
    pub is_activated: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 255))]
    pub display_name: Option<String>,

    pub role: UserRole,

    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub is_activated: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            company_id: user.company_id,
            is_activated: user.is_activated,
            created_at: user.created_at,
        }
    }
}
