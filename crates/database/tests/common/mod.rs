#![allow(dead_code)]

use dam_database::{
    AssetRepository, AuditRepository, CompanyRepository, Database, TeamRepository, UserRepository,
    VersionRepository,
};
use dam_models::asset::{NewAsset, NewAssetVersion};
use dam_models::user::NewUser;
use dam_models::{
    Asset, AssetKind, AuditAction, AuditLogEntry, AuditResourceType, Company, NewAuditLogEntry,
    NewCompany, NewTeam, Team, UploadType, User, UserRole, Visibility,
};
use uuid::Uuid;

pub async fn setup() -> Database {
    let db = Database::in_memory().await.expect("open in-memory database");
    db.migrate().await.expect("run migrations");
    db
}

pub async fn seed_user(db: &Database, role: UserRole, company_id: Option<Uuid>) -> User {
    let users = UserRepository::new(db.pool().clone());
    let mut conn = db.pool().acquire().await.expect("acquire connection");
    users
        .create(
            &mut conn,
            &NewUser {
                email: format!("user-{}@example.com", Uuid::new_v4()),
                display_name: None,
                role,
                company_id,
            },
            true,
        )
        .await
        .expect("create user")
}

pub async fn seed_company(db: &Database, name: &str) -> Company {
    let companies = CompanyRepository::new(db.pool().clone());
    let mut conn = db.pool().acquire().await.expect("acquire connection");
    companies
        .create(
            &mut conn,
            &NewCompany {
                name: name.to_string(),
            },
        )
        .await
        .expect("create company")
}

pub async fn seed_team(db: &Database, name: &str, company_id: Option<Uuid>) -> Team {
    let teams = TeamRepository::new(db.pool().clone());
    let mut conn = db.pool().acquire().await.expect("acquire connection");
    teams
        .create(
            &mut conn,
            &NewTeam {
                name: name.to_string(),
                company_id,
            },
        )
        .await
        .expect("create team")
}

pub fn new_asset(uploader: &User, visibility: Visibility) -> NewAsset {
    NewAsset {
        title: "Launch banner".to_string(),
        description: None,
        kind: AssetKind::Image,
        upload_type: UploadType::General,
        visibility,
        allowed_role: None,
        company_id: uploader.company_id,
        uploader_id: uploader.id,
        file_key: format!("assets/{}.png", Uuid::new_v4()),
        file_name: "banner.png".to_string(),
        content_type: Some("image/png".to_string()),
        size_bytes: Some(2048),
    }
}

/// Asset plus its first version row, the way the service creates them.
pub async fn seed_asset(db: &Database, uploader: &User, visibility: Visibility) -> Asset {
    let assets = AssetRepository::new(db.pool().clone());
    let versions = VersionRepository::new(db.pool().clone());
    let new_asset = new_asset(uploader, visibility);

    let mut conn = db.pool().acquire().await.expect("acquire connection");
    let asset = assets
        .insert(&mut conn, &new_asset)
        .await
        .expect("insert asset");
    versions
        .insert(
            &mut conn,
            asset.id,
            uploader.id,
            &NewAssetVersion {
                file_key: new_asset.file_key.clone(),
                file_name: new_asset.file_name.clone(),
                content_type: new_asset.content_type.clone(),
                size_bytes: new_asset.size_bytes,
            },
        )
        .await
        .expect("insert first version");

    asset
}

pub async fn seed_audit_entry(
    db: &Database,
    user_id: Uuid,
    action: AuditAction,
    resource_type: AuditResourceType,
    resource_id: Option<Uuid>,
) -> AuditLogEntry {
    let audit = AuditRepository::new(db.pool().clone());
    let mut entry = NewAuditLogEntry::new(user_id, action, resource_type);
    if let Some(id) = resource_id {
        entry = entry.resource(id);
    }
    audit.create(&entry).await.expect("append audit entry")
}
