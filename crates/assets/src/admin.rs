use dam_database::{CompanyRepository, Database, DatabaseError, TeamRepository, UserRepository};
use dam_models::audit::{NewAuditLogEntry, RequestContext};
use dam_models::{
    AuditAction, AuditResourceType, Company, NewCompany, NewTeam, NewUser, Team, TeamMember, User,
    UserRole,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, ServiceError};
use crate::ledger::AuditLedger;

/// User, company, and team management. Every privileged mutation commits
/// its audit entry in the same transaction; team membership is organisation
/// structure, not a privileged action, and stays out of the ledger.
pub struct AdminService {
    db: Database,
    users: UserRepository,
    companies: CompanyRepository,
    teams: TeamRepository,
    ledger: AuditLedger,
}

impl AdminService {
    pub fn new(db: Database, ledger: AuditLedger) -> Self {
        let pool = db.pool().clone();

        Self {
            users: UserRepository::new(pool.clone()),
            companies: CompanyRepository::new(pool.clone()),
            teams: TeamRepository::new(pool),
            ledger,
            db,
        }
    }

    /// Admin-created accounts skip the activation step.
    pub async fn create_user(
        &self,
        actor: &User,
        request: NewUser,
        ctx: &RequestContext,
    ) -> Result<User> {
        require_admin(actor)?;
        request.validate()?;

        if let Some(company_id) = request.company_id {
            self.require_company(company_id).await?;
        }

        let mut tx = self.db.pool().begin().await?;

        let user = self.users.create(&mut tx, &request, true).await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Create, AuditResourceType::User)
            .resource(user.id)
            .metadata(json!({
                "email": user.email,
                "role": user.role,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, actor = %actor.id, "user created");
        Ok(user)
    }

    pub async fn list_users(
        &self,
        actor: &User,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64)> {
        require_admin(actor)?;

        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let users = self.users.list(limit, offset).await?;
        let total = self.users.count().await?;

        Ok((users, total))
    }

    pub async fn find_user(&self, id: Uuid) -> Result<User> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn set_role(
        &self,
        actor: &User,
        target_id: Uuid,
        role: UserRole,
        ctx: &RequestContext,
    ) -> Result<User> {
        require_admin(actor)?;
        if actor.id == target_id && role != UserRole::Admin {
            return Err(ServiceError::conflict(
                "admins cannot change their own role",
            ));
        }

        let target = self.users.find_by_id(target_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let updated = self.users.set_role(&mut tx, target.id, role).await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Update, AuditResourceType::User)
            .resource(target.id)
            .metadata(json!({
                "changed": ["role"],
                "previous_role": target.role,
                "new_role": role,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn activate(&self, actor: &User, target_id: Uuid, ctx: &RequestContext) -> Result<User> {
        require_admin(actor)?;
        let target = self.users.find_by_id(target_id).await?;
        self.set_active_flag(actor, &target, true, ctx).await
    }

    pub async fn deactivate(
        &self,
        actor: &User,
        target_id: Uuid,
        ctx: &RequestContext,
    ) -> Result<User> {
        require_admin(actor)?;
        if actor.id == target_id {
            return Err(ServiceError::conflict(
                "admins cannot deactivate their own account",
            ));
        }
        let target = self.users.find_by_id(target_id).await?;
        self.set_active_flag(actor, &target, false, ctx).await
    }

    async fn set_active_flag(
        &self,
        actor: &User,
        target: &User,
        active: bool,
        ctx: &RequestContext,
    ) -> Result<User> {
        let mut tx = self.db.pool().begin().await?;

        let updated = self.users.set_active(&mut tx, target.id, active).await?;

        let entry = NewAuditLogEntry::new(actor.id, AuditAction::Update, AuditResourceType::User)
            .resource(target.id)
            .metadata(json!({
                "changed": ["is_active"],
                "is_active": active,
            }))
            .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn create_company(
        &self,
        actor: &User,
        request: NewCompany,
        ctx: &RequestContext,
    ) -> Result<Company> {
        require_admin(actor)?;
        request.validate()?;

        let mut tx = self.db.pool().begin().await?;

        let company = self.companies.create(&mut tx, &request).await?;

        let entry =
            NewAuditLogEntry::new(actor.id, AuditAction::Create, AuditResourceType::Company)
                .resource(company.id)
                .metadata(json!({ "name": company.name }))
                .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(company)
    }

    pub async fn list_companies(&self, actor: &User) -> Result<Vec<Company>> {
        require_admin(actor)?;
        Ok(self.companies.list().await?)
    }

    /// Users and assets detach rather than disappear; audit references are
    /// nulled by the storage trigger in the same transaction.
    pub async fn delete_company(&self, actor: &User, id: Uuid, ctx: &RequestContext) -> Result<()> {
        require_admin(actor)?;
        let company = self.companies.find_by_id(id).await?;

        let mut tx = self.db.pool().begin().await?;

        let entry =
            NewAuditLogEntry::new(actor.id, AuditAction::Delete, AuditResourceType::Company)
                .resource(company.id)
                .metadata(json!({ "name": company.name }))
                .context(ctx);
        self.ledger.append_with(&mut tx, &entry).await?;

        self.companies.delete(&mut tx, company.id).await?;

        tx.commit().await?;

        tracing::info!(company_id = %company.id, actor = %actor.id, "company deleted");
        Ok(())
    }

    pub async fn create_team(&self, actor: &User, request: NewTeam) -> Result<Team> {
        require_admin(actor)?;
        request.validate()?;

        if let Some(company_id) = request.company_id {
            self.require_company(company_id).await?;
        }

        let mut conn = self.db.pool().acquire().await?;
        Ok(self.teams.create(&mut conn, &request).await?)
    }

    pub async fn list_teams(&self, actor: &User) -> Result<Vec<Team>> {
        require_admin(actor)?;
        Ok(self.teams.list().await?)
    }

    pub async fn add_team_member(
        &self,
        actor: &User,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<TeamMember> {
        require_admin(actor)?;
        let team = self.teams.find_by_id(team_id).await?;
        let user = self.users.find_by_id(user_id).await?;

        let mut conn = self.db.pool().acquire().await?;
        Ok(self.teams.add_member(&mut conn, team.id, user.id).await?)
    }

    pub async fn remove_team_member(
        &self,
        actor: &User,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<()> {
        require_admin(actor)?;

        let mut conn = self.db.pool().acquire().await?;
        Ok(self.teams.remove_member(&mut conn, team_id, user_id).await?)
    }

    /// Idempotent first-admin seed for fresh deployments. Provisioning, not
    /// an admin action, so nothing is audited and no actor is required. An
    /// existing account under the email is promoted instead of duplicated.
    pub async fn ensure_bootstrap_admin(&self, email: &str) -> Result<Option<User>> {
        if self.users.admin_exists().await? {
            return Ok(None);
        }

        let existing = match self.users.find_by_email(email).await {
            Ok(user) => Some(user),
            Err(DatabaseError::NotFound(_)) => None,
            Err(err) => return Err(err.into()),
        };

        let mut conn = self.db.pool().acquire().await?;
        let admin = match existing {
            Some(user) => self.users.set_role(&mut conn, user.id, UserRole::Admin).await?,
            None => {
                self.users
                    .create(
                        &mut conn,
                        &NewUser {
                            email: email.to_string(),
                            display_name: None,
                            role: UserRole::Admin,
                            company_id: None,
                        },
                        true,
                    )
                    .await?
            }
        };

        tracing::info!(user_id = %admin.id, "bootstrap admin ensured");
        Ok(Some(admin))
    }

    async fn require_company(&self, id: Uuid) -> Result<Company> {
        self.companies.find_by_id(id).await.map_err(|err| match err {
            DatabaseError::NotFound(_) => {
                ServiceError::Validation(format!("company {} does not exist", id))
            }
            other => other.into(),
        })
    }
}

fn require_admin(actor: &User) -> Result<()> {
    if actor.role != UserRole::Admin {
        return Err(ServiceError::forbidden("administrator role required"));
    }
    Ok(())
}
