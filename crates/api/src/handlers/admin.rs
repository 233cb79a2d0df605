use axum::{
    extract::{Extension, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use dam_models::{Asset, Company, NewCompany, NewTeam, NewUser, Team, User, UserRole};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::handlers::error::{service_error, ErrorResponse};
use crate::middleware::{client_context, AuthUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReviewQueueResponse {
    pub assets: Vec<Asset>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// Assets waiting for review, oldest submission first
/// GET /api/admin/review-queue
pub async fn review_queue(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ReviewQueueResponse>, (StatusCode, Json<ErrorResponse>)> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);

    let (assets, total) = state
        .assets
        .review_queue(&auth.user, page, limit)
        .await
        .map_err(service_error)?;

    Ok(Json(ReviewQueueResponse {
        assets,
        total,
        page,
        limit,
    }))
}

/// Create a pre-activated account
/// POST /api/admin/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    headers: HeaderMap,
    Json(request): Json<NewUser>,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let user = state
        .admin
        .create_user(&auth.user, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(user))
}

/// List accounts
/// GET /api/admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<PageQuery>,
) -> Result<Json<UserListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);

    let (users, total) = state
        .admin
        .list_users(&auth.user, page, limit)
        .await
        .map_err(service_error)?;

    Ok(Json(UserListResponse {
        users,
        total,
        page,
        limit,
    }))
}

/// Change an account's role
/// PUT /api/admin/users/:id/role
pub async fn set_role(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let user = state
        .admin
        .set_role(&auth.user, id, request.role, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(user))
}

/// Re-enable an account
/// POST /api/admin/users/:id/activate
pub async fn activate_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let user = state
        .admin
        .activate(&auth.user, id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(user))
}

/// Disable an account without deleting its history
/// POST /api/admin/users/:id/deactivate
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let user = state
        .admin
        .deactivate(&auth.user, id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(user))
}

/// Register a company
/// POST /api/admin/companies
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    headers: HeaderMap,
    Json(request): Json<NewCompany>,
) -> Result<Json<Company>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let company = state
        .admin
        .create_company(&auth.user, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(company))
}

/// List companies
/// GET /api/admin/companies
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Company>>, (StatusCode, Json<ErrorResponse>)> {
    let companies = state
        .admin
        .list_companies(&auth.user)
        .await
        .map_err(service_error)?;

    Ok(Json(companies))
}

/// Delete a company; its users and assets detach
/// DELETE /api/admin/companies/:id
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    state
        .admin
        .delete_company(&auth.user, id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create a team
/// POST /api/admin/teams
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<NewTeam>,
) -> Result<Json<Team>, (StatusCode, Json<ErrorResponse>)> {
    let team = state
        .admin
        .create_team(&auth.user, request)
        .await
        .map_err(service_error)?;

    Ok(Json(team))
}

/// List teams
/// GET /api/admin/teams
pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Team>>, (StatusCode, Json<ErrorResponse>)> {
    let teams = state
        .admin
        .list_teams(&auth.user)
        .await
        .map_err(service_error)?;

    Ok(Json(teams))
}

/// Put a user on a team
/// POST /api/admin/teams/:id/members
pub async fn add_team_member(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .admin
        .add_team_member(&auth.user, id, request.user_id)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Take a user off a team
/// DELETE /api/admin/teams/:id/members/:user_id
pub async fn remove_team_member(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .admin
        .remove_team_member(&auth.user, id, user_id)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}
