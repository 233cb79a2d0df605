use dam_models::{Asset, User, UserRole, Visibility};
use uuid::Uuid;

/// Caller projection handed to the evaluator. `team_ids` backs the TEAM
/// rule; building a view without them is fine for edit checks, which never
/// consult teams.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: Uuid,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub is_active: bool,
    pub team_ids: Vec<Uuid>,
}

impl UserView {
    pub fn new(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            company_id: user.company_id,
            is_active: user.is_active,
            team_ids: Vec::new(),
        }
    }

    pub fn with_teams(mut self, team_ids: Vec<Uuid>) -> Self {
        self.team_ids = team_ids;
        self
    }
}

/// Asset projection: only the fields the visibility rules read.
#[derive(Debug, Clone)]
pub struct AssetView {
    pub id: Uuid,
    pub uploader_id: Uuid,
    pub company_id: Option<Uuid>,
    pub visibility: Visibility,
    pub allowed_role: Option<UserRole>,
}

impl From<&Asset> for AssetView {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            uploader_id: asset.uploader_id,
            company_id: asset.company_id,
            visibility: asset.visibility,
            allowed_role: asset.allowed_role,
        }
    }
}
