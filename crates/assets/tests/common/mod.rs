#![allow(dead_code)]

use dam_assets::{AdminService, AssetService, AuditLedger, CreateAssetRequest, ObjectStorage};
use dam_database::{CompanyRepository, Database, UserRepository};
use dam_models::company::NewCompany;
use dam_models::user::NewUser;
use dam_models::{AssetKind, Company, RequestContext, UploadType, User, UserRole, Visibility};
use uuid::Uuid;

pub struct TestApp {
    pub db: Database,
    pub assets: AssetService,
    pub admin: AdminService,
    pub ledger: AuditLedger,
}

pub async fn setup() -> TestApp {
    let db = Database::in_memory().await.expect("open in-memory database");
    db.migrate().await.expect("run migrations");

    let ledger = AuditLedger::new(db.pool().clone());
    let storage = ObjectStorage::new("https://cdn.example.com/assethub");
    let assets = AssetService::new(db.clone(), ledger.clone(), storage);
    let admin = AdminService::new(db.clone(), ledger.clone());

    TestApp {
        db,
        assets,
        admin,
        ledger,
    }
}

pub async fn seed_user(app: &TestApp, role: UserRole, company_id: Option<Uuid>) -> User {
    let users = UserRepository::new(app.db.pool().clone());
    let mut conn = app.db.pool().acquire().await.expect("acquire connection");
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
        .expect("seed user")
}

pub async fn seed_company(app: &TestApp, name: &str) -> Company {
    let companies = CompanyRepository::new(app.db.pool().clone());
    let mut conn = app.db.pool().acquire().await.expect("acquire connection");
    companies
        .create(
            &mut conn,
            &NewCompany {
                name: name.to_string(),
            },
        )
        .await
        .expect("seed company")
}

pub fn ctx() -> RequestContext {
    RequestContext {
        ip_address: Some("127.0.0.1".to_string()),
        user_agent: Some("integration-tests".to_string()),
    }
}

pub fn create_request(visibility: Visibility) -> CreateAssetRequest {
    CreateAssetRequest {
        title: "Launch banner".to_string(),
        description: None,
        kind: AssetKind::Image,
        upload_type: UploadType::General,
        visibility: Some(visibility),
        allowed_role: None,
        file_key: format!("assets/{}.png", Uuid::new_v4()),
        file_name: "banner.png".to_string(),
        content_type: Some("image/png".to_string()),
        size_bytes: Some(2048),
    }
}

pub fn carousel_request() -> CreateAssetRequest {
    CreateAssetRequest {
        kind: AssetKind::Carousel,
        title: "Homepage carousel".to_string(),
        ..create_request(Visibility::Public)
    }
}
