use std::sync::Arc;

use dam_database::{
    AssetRepository, CarouselRepository, Database, ShareRepository, TeamRepository,
    UserRepository, VersionRepository,
};
use dam_models::asset::{
    Asset, AssetFilter, AssetShare, AssetTeamShare, AssetUpdate, CarouselItem, NewAsset,
    NewAssetVersion, NewCarouselItem,
};
use dam_models::audit::{NewAuditLogEntry, RequestContext};
use dam_models::{
    AssetKind, AssetStatus, AssetVersion, AuditAction, AuditResourceType, UploadType, User,
    UserRole, Visibility,
};
use dam_visibility::{AssetView, PrefetchedShares, UserView, VisibilityEvaluator};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, ServiceError};
use crate::ledger::AuditLedger;
use crate::storage::ObjectStorage;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub kind: AssetKind,

    #[serde(default)]
    pub upload_type: UploadType,

    /// Defaults to UPLOADER_ONLY until the uploader widens it.
    pub visibility: Option<Visibility>,
    pub allowed_role: Option<UserRole>,

    #[validate(length(min = 1, max = 1024))]
    pub file_key: String,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    pub content_type: Option<String>,

    #[validate(range(min = 0))]
    pub size_bytes: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApproveRequest {
    /// Applied atomically with the approval when present.
    pub new_visibility: Option<Visibility>,
    pub allowed_role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetVisibilityRequest {
    pub visibility: Visibility,
    pub allowed_role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadGrant {
    pub download_url: String,
    pub file_key: String,
    pub version_number: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareList {
    pub users: Vec<AssetShare>,
    pub teams: Vec<AssetTeamShare>,
}

/// Asset lifecycle operations. Every check that grants or denies access to
/// an asset goes through the evaluator; every mutation commits its audit
/// entry in the same transaction.
pub struct AssetService {
    db: Database,
    assets: AssetRepository,
    versions: VersionRepository,
    carousel: CarouselRepository,
    shares: Arc<ShareRepository>,
    teams: TeamRepository,
    users: UserRepository,
    evaluator: VisibilityEvaluator,
    ledger: AuditLedger,
    storage: ObjectStorage,
}

impl AssetService {
    pub fn new(db: Database, ledger: AuditLedger, storage: ObjectStorage) -> Self {
        let pool = db.pool().clone();
        let shares = Arc::new(ShareRepository::new(pool.clone()));

        Self {
            evaluator: VisibilityEvaluator::new(shares.clone()),
            assets: AssetRepository::new(pool.clone()),
            versions: VersionRepository::new(pool.clone()),
            carousel: CarouselRepository::new(pool.clone()),
            teams: TeamRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            shares,
            ledger,
            storage,
            db,
        }
    }

    pub async fn create_asset(
        &self,
        actor: &User,
        request: CreateAssetRequest,
        ctx: &RequestContext,
    ) -> Result<Asset> {
        request.validate()?;

        let visibility = request.visibility.unwrap_or(Visibility::UploaderOnly);
        check_role_pairing(visibility, request.allowed_role)?;

        let new_asset = NewAsset {
            title: request.title,
            description: request.description,
            kind: request.kind,
            upload_type: request.upload_type,
            visibility,
            allowed_role: request.allowed_role,
            company_id: actor.company_id,
            uploader_id: actor.id,
            file_key: request.file_key,
            file_name: request.file_name,
            content_type: request.content_type,
            size_bytes: request.size_bytes,
        };

        let mut tx = self.db.pool().begin().await?;

        let asset = self.assets.insert(&mut tx, &new_asset).await?;
        let version = self
            .versions
            .insert(
                &mut tx,
                asset.id,
                actor.id,
                &NewAssetVersion {
                    file_key: asset.file_key.clone(),
                    file_name: asset.file_name.clone(),
                    content_type: asset.content_type.clone(),
                    size_bytes: asset.size_bytes,
                },
            )
            .await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Upload, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "title": asset.title,
                "file_name": asset.file_name,
                "version_number": version.version_number,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;

        tracing::info!(asset_id = %asset.id, uploader = %actor.id, "asset created");
        Ok(asset)
    }

    pub async fn get_asset(&self, actor: &User, id: Uuid) -> Result<Asset> {
        let asset = self.require_asset(id).await?;
        let viewer = self.viewer(actor).await?;

        if !self.evaluator.can_view(&viewer, &AssetView::from(&asset)).await {
            return Err(ServiceError::forbidden("you cannot view this asset"));
        }

        Ok(asset)
    }

    /// Repository filtering first, then the evaluator decides row by row
    /// against prefetched share grants. Pagination happens over the visible
    /// set so totals reflect what the caller may actually see.
    pub async fn list_assets(
        &self,
        actor: &User,
        filter: &AssetFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Asset>, i64)> {
        let candidates = self.assets.list(filter).await?;

        let viewer = self.viewer(actor).await?;
        let direct = self.shares.direct_grants_for_user(actor.id).await?;
        let team = self.shares.team_grants_for_user(actor.id).await?;
        let evaluator = VisibilityEvaluator::new(Arc::new(PrefetchedShares::new(
            actor.id, direct, team,
        )));

        let mut visible = Vec::new();
        for asset in candidates {
            if evaluator.can_view(&viewer, &AssetView::from(&asset)).await {
                visible.push(asset);
            }
        }

        let total = visible.len() as i64;
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let start = ((page - 1) * limit) as usize;
        let assets = visible
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        Ok((assets, total))
    }

    pub async fn update_asset(
        &self,
        actor: &User,
        id: Uuid,
        update: AssetUpdate,
        ctx: &RequestContext,
    ) -> Result<Asset> {
        update.validate()?;
        let asset = self.require_editable(actor, id).await?;

        let mut changed = Vec::new();
        if update.title.is_some() {
            changed.push("title");
        }
        if update.description.is_some() {
            changed.push("description");
        }

        let mut tx = self.db.pool().begin().await?;

        let updated = self.assets.update_details(&mut tx, asset.id, &update).await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Update, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({ "changed": changed }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// The audit entry is written before the delete so the same transaction
    /// that removes the row detaches the entry's reference.
    pub async fn delete_asset(&self, actor: &User, id: Uuid, ctx: &RequestContext) -> Result<()> {
        let asset = self.require_editable(actor, id).await?;

        let mut tx = self.db.pool().begin().await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Delete, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "title": asset.title,
                "file_key": asset.file_key,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        self.assets.delete(&mut tx, asset.id).await?;

        tx.commit().await?;

        tracing::info!(asset_id = %asset.id, actor = %actor.id, "asset deleted");
        Ok(())
    }

    pub async fn submit_for_review(
        &self,
        actor: &User,
        id: Uuid,
        ctx: &RequestContext,
    ) -> Result<Asset> {
        self.submit_transition(actor, id, AssetStatus::Draft, AuditAction::Create, ctx)
            .await
    }

    /// Rejected assets go back into review after rework.
    pub async fn resubmit(&self, actor: &User, id: Uuid, ctx: &RequestContext) -> Result<Asset> {
        self.submit_transition(actor, id, AssetStatus::Rejected, AuditAction::Update, ctx)
            .await
    }

    async fn submit_transition(
        &self,
        actor: &User,
        id: Uuid,
        expected: AssetStatus,
        action: AuditAction,
        ctx: &RequestContext,
    ) -> Result<Asset> {
        let asset = self.require_editable(actor, id).await?;

        let mut tx = self.db.pool().begin().await?;

        let submitted = self
            .assets
            .transition_status(&mut tx, asset.id, expected, AssetStatus::PendingReview, None)
            .await?
            .ok_or_else(|| {
                ServiceError::conflict(format!(
                    "asset must be {} to enter review, found {}",
                    expected, asset.status
                ))
            })?;

        let entry = NewAuditLogEntry::new(actor.id, action, AuditResourceType::Approval)
            .resource(asset.id)
            .metadata(json!({
                "previous_status": expected.to_string(),
                "new_status": AssetStatus::PendingReview.to_string(),
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(submitted)
    }

    /// Admin approval, optionally retargeting visibility in the same
    /// transition. Exactly one audit entry per successful approval.
    pub async fn approve(
        &self,
        actor: &User,
        id: Uuid,
        request: ApproveRequest,
        ctx: &RequestContext,
    ) -> Result<Asset> {
        require_admin(actor, "only admins can approve assets")?;

        let visibility_change = match request.new_visibility {
            Some(visibility) => {
                check_role_pairing(visibility, request.allowed_role)?;
                Some((visibility, request.allowed_role))
            }
            None if request.allowed_role.is_some() => {
                return Err(ServiceError::Validation(
                    "allowed_role requires a visibility change".to_string(),
                ));
            }
            None => None,
        };

        let asset = self.require_asset(id).await?;

        let mut tx = self.db.pool().begin().await?;

        let approved = self
            .assets
            .transition_status(
                &mut tx,
                asset.id,
                AssetStatus::PendingReview,
                AssetStatus::Approved,
                visibility_change,
            )
            .await?
            .ok_or_else(|| {
                ServiceError::conflict(format!(
                    "only assets pending review can be approved, found {}",
                    asset.status
                ))
            })?;

        let mut metadata = json!({
            "previous_status": AssetStatus::PendingReview.to_string(),
            "new_status": AssetStatus::Approved.to_string(),
        });
        if let Some((visibility, _)) = visibility_change {
            metadata["new_visibility"] = json!(visibility.to_string());
        }

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Approve, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(metadata)
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;

        tracing::info!(asset_id = %asset.id, reviewer = %actor.id, "asset approved");
        Ok(approved)
    }

    pub async fn reject(
        &self,
        actor: &User,
        id: Uuid,
        request: RejectRequest,
        ctx: &RequestContext,
    ) -> Result<Asset> {
        require_admin(actor, "only admins can reject assets")?;
        request.validate()?;

        let asset = self.require_asset(id).await?;

        let mut tx = self.db.pool().begin().await?;

        let rejected = self
            .assets
            .transition_status(
                &mut tx,
                asset.id,
                AssetStatus::PendingReview,
                AssetStatus::Rejected,
                None,
            )
            .await?
            .ok_or_else(|| {
                ServiceError::conflict(format!(
                    "only assets pending review can be rejected, found {}",
                    asset.status
                ))
            })?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Reject, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "previous_status": AssetStatus::PendingReview.to_string(),
                "new_status": AssetStatus::Rejected.to_string(),
                "reason": request.reason,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;

        tracing::info!(asset_id = %asset.id, reviewer = %actor.id, "asset rejected");
        Ok(rejected)
    }

    pub async fn set_visibility(
        &self,
        actor: &User,
        id: Uuid,
        request: SetVisibilityRequest,
        ctx: &RequestContext,
    ) -> Result<Asset> {
        check_role_pairing(request.visibility, request.allowed_role)?;
        let asset = self.require_editable(actor, id).await?;

        let mut tx = self.db.pool().begin().await?;

        let updated = self
            .assets
            .set_visibility(&mut tx, asset.id, request.visibility, request.allowed_role)
            .await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Update, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "changed": ["visibility"],
                "previous_visibility": asset.visibility.to_string(),
                "new_visibility": request.visibility.to_string(),
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn add_version(
        &self,
        actor: &User,
        id: Uuid,
        request: NewAssetVersion,
        ctx: &RequestContext,
    ) -> Result<AssetVersion> {
        request.validate()?;
        let asset = self.require_editable(actor, id).await?;

        let mut tx = self.db.pool().begin().await?;

        let version = self.versions.insert(&mut tx, asset.id, actor.id, &request).await?;
        self.assets
            .set_current_file(
                &mut tx,
                asset.id,
                &version.file_key,
                &version.file_name,
                version.content_type.as_deref(),
                version.size_bytes,
                version.version_number,
            )
            .await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Upload, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "file_name": version.file_name,
                "version_number": version.version_number,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(version)
    }

    pub async fn list_versions(&self, actor: &User, id: Uuid) -> Result<Vec<AssetVersion>> {
        let asset = self.require_viewable(actor, id).await?;
        Ok(self.versions.list_for_asset(asset.id).await?)
    }

    /// Hands out a URL only for approved content, except to users who could
    /// edit the asset anyway. The DOWNLOAD entry is appended before the URL
    /// is returned; an append failure fails the download.
    pub async fn download(&self, actor: &User, id: Uuid, ctx: &RequestContext) -> Result<DownloadGrant> {
        let asset = self.require_asset(id).await?;
        let viewer = self.viewer(actor).await?;
        let view = AssetView::from(&asset);

        if !self.evaluator.can_view(&viewer, &view).await {
            return Err(ServiceError::forbidden("you cannot view this asset"));
        }
        if asset.status != AssetStatus::Approved && !self.evaluator.can_edit(&viewer, &view) {
            return Err(ServiceError::forbidden("asset is not approved for download"));
        }

        let download_url = self.storage.download_url(&asset.file_key)?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Download, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "file_name": asset.file_name,
                "version_number": asset.current_version,
            }))
            .context(ctx);
        self.ledger.append(&entry).await?;

        Ok(DownloadGrant {
            download_url,
            file_key: asset.file_key,
            version_number: asset.current_version,
        })
    }

    pub async fn share_with_user(
        &self,
        actor: &User,
        asset_id: Uuid,
        user_id: Uuid,
        ctx: &RequestContext,
    ) -> Result<AssetShare> {
        let asset = self.require_editable(actor, asset_id).await?;
        let target = self.users.find_by_id(user_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let share = self
            .shares
            .add_user_share(&mut tx, asset.id, target.id, Some(actor.id))
            .await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Share, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({ "grantee_user_id": target.id }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(share)
    }

    pub async fn unshare_user(
        &self,
        actor: &User,
        asset_id: Uuid,
        user_id: Uuid,
        ctx: &RequestContext,
    ) -> Result<()> {
        let asset = self.require_editable(actor, asset_id).await?;

        let mut tx = self.db.pool().begin().await?;

        self.shares
            .remove_user_share(&mut tx, asset.id, user_id)
            .await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Share, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({ "grantee_user_id": user_id, "revoked": true }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn share_with_team(
        &self,
        actor: &User,
        asset_id: Uuid,
        team_id: Uuid,
        ctx: &RequestContext,
    ) -> Result<AssetTeamShare> {
        let asset = self.require_editable(actor, asset_id).await?;
        let team = self.teams.find_by_id(team_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let share = self
            .shares
            .add_team_share(&mut tx, asset.id, team.id, Some(actor.id))
            .await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Share, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({ "grantee_team_id": team.id }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(share)
    }

    pub async fn unshare_team(
        &self,
        actor: &User,
        asset_id: Uuid,
        team_id: Uuid,
        ctx: &RequestContext,
    ) -> Result<()> {
        let asset = self.require_editable(actor, asset_id).await?;

        let mut tx = self.db.pool().begin().await?;

        self.shares
            .remove_team_share(&mut tx, asset.id, team_id)
            .await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Share, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({ "grantee_team_id": team_id, "revoked": true }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_shares(&self, actor: &User, asset_id: Uuid) -> Result<ShareList> {
        let asset = self.require_editable(actor, asset_id).await?;

        let users = self.shares.list_user_shares(asset.id).await?;
        let teams = self.shares.list_team_shares(asset.id).await?;

        Ok(ShareList { users, teams })
    }

    pub async fn add_carousel_item(
        &self,
        actor: &User,
        asset_id: Uuid,
        request: NewCarouselItem,
        ctx: &RequestContext,
    ) -> Result<CarouselItem> {
        request.validate()?;
        let asset = self.require_carousel(actor, asset_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let position = self.carousel.next_position(&mut tx, asset.id).await?;
        let item = self.carousel.insert(&mut tx, asset.id, &request, position).await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Update, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "carousel_item_id": item.id,
                "change": "item_added",
                "position": position,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn list_carousel_items(&self, actor: &User, asset_id: Uuid) -> Result<Vec<CarouselItem>> {
        let asset = self.require_viewable(actor, asset_id).await?;
        if asset.kind != AssetKind::Carousel {
            return Err(ServiceError::conflict("asset is not a carousel"));
        }
        Ok(self.carousel.list_for_asset(asset.id).await?)
    }

    pub async fn remove_carousel_item(
        &self,
        actor: &User,
        asset_id: Uuid,
        item_id: Uuid,
        ctx: &RequestContext,
    ) -> Result<()> {
        let asset = self.require_carousel(actor, asset_id).await?;
        let items = self.carousel.list_for_asset(asset.id).await?;
        if !items.iter().any(|item| item.id == item_id) {
            return Err(ServiceError::not_found("Carousel item", item_id));
        }

        let mut tx = self.db.pool().begin().await?;

        self.carousel.delete(&mut tx, item_id).await?;
        // close the gap so positions stay dense
        for (position, item) in items.iter().filter(|item| item.id != item_id).enumerate() {
            if item.position != position as i64 {
                self.carousel.set_position(&mut tx, item.id, position as i64).await?;
            }
        }

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Update, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "carousel_item_id": item_id,
                "change": "item_removed",
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn move_carousel_item(
        &self,
        actor: &User,
        asset_id: Uuid,
        item_id: Uuid,
        new_position: i64,
        ctx: &RequestContext,
    ) -> Result<Vec<CarouselItem>> {
        let asset = self.require_carousel(actor, asset_id).await?;
        let mut items = self.carousel.list_for_asset(asset.id).await?;

        let current = items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| ServiceError::not_found("Carousel item", item_id))?;

        let target = new_position.clamp(0, items.len() as i64 - 1) as usize;
        let moved = items.remove(current);
        items.insert(target, moved);

        let mut tx = self.db.pool().begin().await?;

        for (position, item) in items.iter_mut().enumerate() {
            if item.position != position as i64 {
                self.carousel.set_position(&mut tx, item.id, position as i64).await?;
                item.position = position as i64;
            }
        }

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Update, AuditResourceType::Asset)
            .resource(asset.id)
            .metadata(json!({
                "carousel_item_id": item_id,
                "change": "item_moved",
                "position": target,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(items)
    }

    /// Oldest submissions first, so nothing sits in the queue forever.
    pub async fn review_queue(
        &self,
        actor: &User,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Asset>, i64)> {
        require_admin(actor, "only admins can read the review queue")?;

        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let assets = self.assets.list_pending(limit, offset).await?;
        let total = self.assets.count_pending().await?;

        Ok((assets, total))
    }

    async fn require_asset(&self, id: Uuid) -> Result<Asset> {
        self.assets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Asset", id))
    }

    async fn require_viewable(&self, actor: &User, id: Uuid) -> Result<Asset> {
        let asset = self.require_asset(id).await?;
        let viewer = self.viewer(actor).await?;
        if !self.evaluator.can_view(&viewer, &AssetView::from(&asset)).await {
            return Err(ServiceError::forbidden("you cannot view this asset"));
        }
        Ok(asset)
    }

    async fn require_editable(&self, actor: &User, id: Uuid) -> Result<Asset> {
        let asset = self.require_asset(id).await?;
        if !self.evaluator.can_edit(&UserView::new(actor), &AssetView::from(&asset)) {
            return Err(ServiceError::forbidden("you cannot modify this asset"));
        }
        Ok(asset)
    }

    async fn require_carousel(&self, actor: &User, id: Uuid) -> Result<Asset> {
        let asset = self.require_editable(actor, id).await?;
        if asset.kind != AssetKind::Carousel {
            return Err(ServiceError::conflict("asset is not a carousel"));
        }
        Ok(asset)
    }

    /// View checks need team memberships; edit checks do not.
    async fn viewer(&self, actor: &User) -> Result<UserView> {
        let team_ids = self.teams.team_ids_for_user(actor.id).await?;
        Ok(UserView::new(actor).with_teams(team_ids))
    }
}

fn require_admin(actor: &User, message: &str) -> Result<()> {
    if actor.role != UserRole::Admin {
        return Err(ServiceError::forbidden(message));
    }
    Ok(())
}

fn check_role_pairing(visibility: Visibility, allowed_role: Option<UserRole>) -> Result<()> {
    if !visibility.accepts_allowed_role(allowed_role) {
        if visibility.requires_allowed_role() {
            return Err(ServiceError::Validation(
                "ROLE visibility requires allowed_role".to_string(),
            ));
        }
        return Err(ServiceError::Validation(format!(
            "allowed_role cannot be combined with {} visibility",
            visibility
        )));
    }
    Ok(())
}
