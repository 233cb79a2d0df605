use axum::{extract::Extension, Json};
use dam_models::UserProfile;

use crate::middleware::AuthUser;

/// Profile of the authenticated user
/// GET /api/users/me
pub async fn me(Extension(auth): Extension<AuthUser>) -> Json<UserProfile> {
    Json(UserProfile::from(auth.user))
}
