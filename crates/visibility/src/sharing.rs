use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SharingError {
    #[error("sharing lookup unavailable: {0}")]
    Unavailable(String),
}

/// Injected lookup for TEAM and SELECTED_USERS grants. The evaluator owns
/// no storage; whoever constructs it decides where grants live.
#[async_trait]
pub trait SharingCapability: Send + Sync {
    async fn is_shared_with_user(&self, asset_id: Uuid, user_id: Uuid)
        -> Result<bool, SharingError>;

    async fn is_shared_with_team(&self, asset_id: Uuid, team_id: Uuid)
        -> Result<bool, SharingError>;
}

/// Grants loaded up front for one user, so list endpoints run the evaluator
/// per row without a query per row. Lookups for a different user answer
/// false rather than guessing.
#[derive(Debug, Clone, Default)]
pub struct PrefetchedShares {
    user_id: Uuid,
    direct_grants: HashSet<Uuid>,
    team_grants: HashSet<(Uuid, Uuid)>,
}

impl PrefetchedShares {
    pub fn new(
        user_id: Uuid,
        direct_grants: HashSet<Uuid>,
        team_grants: HashSet<(Uuid, Uuid)>,
    ) -> Self {
        Self {
            user_id,
            direct_grants,
            team_grants,
        }
    }
}

#[async_trait]
impl SharingCapability for PrefetchedShares {
    async fn is_shared_with_user(
        &self,
        asset_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, SharingError> {
        Ok(user_id == self.user_id && self.direct_grants.contains(&asset_id))
    }

    async fn is_shared_with_team(
        &self,
        asset_id: Uuid,
        team_id: Uuid,
    ) -> Result<bool, SharingError> {
        Ok(self.team_grants.contains(&(asset_id, team_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prefetched_shares_answer_for_their_user_only() {
        let user = Uuid::new_v4();
        let other_user = Uuid::new_v4();
        let asset = Uuid::new_v4();
        let team = Uuid::new_v4();

        let shares = PrefetchedShares::new(
            user,
            HashSet::from([asset]),
            HashSet::from([(asset, team)]),
        );

        assert!(shares.is_shared_with_user(asset, user).await.unwrap());
        assert!(!shares.is_shared_with_user(asset, other_user).await.unwrap());
        assert!(!shares
            .is_shared_with_user(Uuid::new_v4(), user)
            .await
            .unwrap());

        assert!(shares.is_shared_with_team(asset, team).await.unwrap());
        assert!(!shares
            .is_shared_with_team(asset, Uuid::new_v4())
            .await
            .unwrap());
    }
}
