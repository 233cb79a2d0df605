use std::sync::Arc;

use dam_models::{UserRole, Visibility};

use crate::sharing::SharingCapability;
use crate::view::{AssetView, UserView};

/// The single permission decision point. Every read and mutation path goes
/// through `can_view`/`can_edit`; no route compares roles on its own.
#[derive(Clone)]
pub struct VisibilityEvaluator {
    sharing: Arc<dyn SharingCapability>,
}

impl VisibilityEvaluator {
    pub fn new(sharing: Arc<dyn SharingCapability>) -> Self {
        Self { sharing }
    }

    /// Ordered rules, first match wins, deny by default. Never returns an
    /// error: a failed sharing lookup logs and denies.
    pub async fn can_view(&self, user: &UserView, asset: &AssetView) -> bool {
        if !user.is_active {
            return false;
        }
        if user.id == asset.uploader_id {
            return true;
        }
        if user.role == UserRole::Admin {
            return true;
        }

        match asset.visibility {
            Visibility::Public => true,
            Visibility::Company => match (user.company_id, asset.company_id) {
                // Null on either side never matches, including null-null
                (Some(user_company), Some(asset_company)) => user_company == asset_company,
                _ => false,
            },
            Visibility::Role => asset
                .allowed_role
                .map_or(false, |allowed| allowed == user.role),
            Visibility::Team => {
                for team_id in &user.team_ids {
                    match self.sharing.is_shared_with_team(asset.id, *team_id).await {
                        Ok(true) => return true,
                        Ok(false) => {}
                        Err(err) => {
                            tracing::warn!(
                                asset_id = %asset.id,
                                team_id = %team_id,
                                error = %err,
                                "team share lookup failed, denying"
                            );
                            return false;
                        }
                    }
                }
                false
            }
            Visibility::SelectedUsers => {
                match self.sharing.is_shared_with_user(asset.id, user.id).await {
                    Ok(shared) => shared,
                    Err(err) => {
                        tracing::warn!(
                            asset_id = %asset.id,
                            user_id = %user.id,
                            error = %err,
                            "user share lookup failed, denying"
                        );
                        false
                    }
                }
            }
            // Only the uploader/admin rules above grant these
            Visibility::UploaderOnly | Visibility::AdminOnly => false,
        }
    }

    /// Strictly narrower than `can_view`: uploader or admin, nothing else.
    /// Editing never follows the sharing rules.
    pub fn can_edit(&self, user: &UserView, asset: &AssetView) -> bool {
        user.is_active && (user.id == asset.uploader_id || user.role == UserRole::Admin)
    }
}
