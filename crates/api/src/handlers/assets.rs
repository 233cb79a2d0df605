use axum::{
    extract::{Extension, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use dam_assets::{
    ApproveRequest, CreateAssetRequest, DownloadGrant, RejectRequest, SetVisibilityRequest,
    ShareList,
};
use dam_models::{
    Asset, AssetFilter, AssetKind, AssetShare, AssetStatus, AssetTeamShare, AssetUpdate,
    AssetVersion, CarouselItem, NewAssetVersion, NewCarouselItem, UploadType,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::handlers::error::{service_error, ErrorResponse};
use crate::middleware::{client_context, AuthUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListAssetsQuery {
    pub status: Option<AssetStatus>,
    pub kind: Option<AssetKind>,
    pub upload_type: Option<UploadType>,
    pub uploader_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AssetListResponse {
    pub assets: Vec<Asset>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct ShareUserRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ShareTeamRequest {
    pub team_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MoveItemRequest {
    pub position: i64,
}

/// Upload a new asset
/// POST /api/assets
pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    headers: HeaderMap,
    Json(request): Json<CreateAssetRequest>,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let asset = state
        .assets
        .create_asset(&auth.user, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// List assets visible to the caller
/// GET /api/assets
pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListAssetsQuery>,
) -> Result<Json<AssetListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let filter = AssetFilter {
        status: params.status,
        kind: params.kind,
        upload_type: params.upload_type,
        uploader_id: params.uploader_id,
        company_id: params.company_id,
        search: params.search,
    };
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);

    let (assets, total) = state
        .assets
        .list_assets(&auth.user, &filter, page, limit)
        .await
        .map_err(service_error)?;

    Ok(Json(AssetListResponse {
        assets,
        total,
        page,
        limit,
    }))
}

/// Fetch a single asset
/// GET /api/assets/:id
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let asset = state
        .assets
        .get_asset(&auth.user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// Update title/description
/// PUT /api/assets/:id
pub async fn update_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(update): Json<AssetUpdate>,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let asset = state
        .assets
        .update_asset(&auth.user, id, update, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// Delete an asset
/// DELETE /api/assets/:id
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    state
        .assets
        .delete_asset(&auth.user, id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Move a draft into review
/// POST /api/assets/:id/submit
pub async fn submit_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let asset = state
        .assets
        .submit_for_review(&auth.user, id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// Send a rejected asset back into review
/// POST /api/assets/:id/resubmit
pub async fn resubmit_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let asset = state
        .assets
        .resubmit(&auth.user, id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// Approve a pending asset, optionally retargeting its visibility
/// POST /api/assets/:id/approve
pub async fn approve_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Option<Json<ApproveRequest>>,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let asset = state
        .assets
        .approve(&auth.user, id, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// Reject a pending asset
/// POST /api/assets/:id/reject
pub async fn reject_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Option<Json<RejectRequest>>,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let asset = state
        .assets
        .reject(&auth.user, id, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// Change who can see an asset
/// PUT /api/assets/:id/visibility
pub async fn set_visibility(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<SetVisibilityRequest>,
) -> Result<Json<Asset>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let asset = state
        .assets
        .set_visibility(&auth.user, id, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(asset))
}

/// Resolve a download URL for the current file
/// GET /api/assets/:id/download
pub async fn download_asset(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<DownloadGrant>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let grant = state
        .assets
        .download(&auth.user, id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(grant))
}

/// List the version history
/// GET /api/assets/:id/versions
pub async fn list_versions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AssetVersion>>, (StatusCode, Json<ErrorResponse>)> {
    let versions = state
        .assets
        .list_versions(&auth.user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(versions))
}

/// Upload a replacement file as a new version
/// POST /api/assets/:id/versions
pub async fn add_version(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<NewAssetVersion>,
) -> Result<Json<AssetVersion>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let version = state
        .assets
        .add_version(&auth.user, id, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(version))
}

/// List user and team grants
/// GET /api/assets/:id/shares
pub async fn list_shares(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareList>, (StatusCode, Json<ErrorResponse>)> {
    let shares = state
        .assets
        .list_shares(&auth.user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(shares))
}

/// Grant access to a single user
/// POST /api/assets/:id/shares
pub async fn share_with_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<ShareUserRequest>,
) -> Result<Json<AssetShare>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let share = state
        .assets
        .share_with_user(&auth.user, id, request.user_id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(share))
}

/// Revoke a user grant
/// DELETE /api/assets/:id/shares/:user_id
pub async fn unshare_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    state
        .assets
        .unshare_user(&auth.user, id, user_id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Grant access to every member of a team
/// POST /api/assets/:id/team-shares
pub async fn share_with_team(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<ShareTeamRequest>,
) -> Result<Json<AssetTeamShare>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let share = state
        .assets
        .share_with_team(&auth.user, id, request.team_id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(share))
}

/// Revoke a team grant
/// DELETE /api/assets/:id/team-shares/:team_id
pub async fn unshare_team(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, team_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    state
        .assets
        .unshare_team(&auth.user, id, team_id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// List carousel slides in display order
/// GET /api/assets/:id/items
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CarouselItem>>, (StatusCode, Json<ErrorResponse>)> {
    let items = state
        .assets
        .list_carousel_items(&auth.user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(items))
}

/// Append a slide to a carousel
/// POST /api/assets/:id/items
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<NewCarouselItem>,
) -> Result<Json<CarouselItem>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let item = state
        .assets
        .add_carousel_item(&auth.user, id, request, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(item))
}

/// Move a slide to a new position
/// PUT /api/assets/:id/items/:item_id/position
pub async fn move_item(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(request): Json<MoveItemRequest>,
) -> Result<Json<Vec<CarouselItem>>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    let items = state
        .assets
        .move_carousel_item(&auth.user, id, item_id, request.position, &ctx)
        .await
        .map_err(service_error)?;

    Ok(Json(items))
}

/// Remove a slide
/// DELETE /api/assets/:id/items/:item_id
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let ctx = client_context(&headers);

    state
        .assets
        .remove_carousel_item(&auth.user, id, item_id, &ctx)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}
