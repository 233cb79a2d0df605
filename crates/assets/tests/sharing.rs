mod common;

use dam_assets::{ServiceError, SetVisibilityRequest};
use dam_database::DatabaseError;
use dam_models::asset::NewCarouselItem;
use dam_models::team::NewTeam;
use dam_models::{AssetFilter, AuditAction, AuditLogFilter, UserRole, Visibility};
use uuid::Uuid;

use common::{carousel_request, create_request, ctx};

#[tokio::test]
async fn selected_users_grants_open_and_close_access() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::SelectedUsers), &ctx())
        .await
        .unwrap();

    let err = app.assets.get_asset(&seo, asset.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    app.assets
        .share_with_user(&creator, asset.id, seo.id, &ctx())
        .await
        .unwrap();
    let visible = app.assets.get_asset(&seo, asset.id).await.unwrap();
    assert_eq!(visible.id, asset.id);

    app.assets
        .unshare_user(&creator, asset.id, seo.id, &ctx())
        .await
        .unwrap();
    let err = app.assets.get_asset(&seo, asset.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let (entries, total) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Share),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(total, 2, "grant and revocation are both recorded");
    assert!(entries.iter().any(|entry| entry.metadata["revoked"] == true));
}

#[tokio::test]
async fn team_shares_reach_team_members() {
    let app = common::setup().await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let member = common::seed_user(&app, UserRole::SeoSpecialist, None).await;
    let outsider = common::seed_user(&app, UserRole::SeoSpecialist, None).await;

    let team = app
        .admin
        .create_team(
            &admin,
            NewTeam {
                name: "Design".to_string(),
                company_id: None,
            },
        )
        .await
        .unwrap();
    app.admin.add_team_member(&admin, team.id, member.id).await.unwrap();

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Team), &ctx())
        .await
        .unwrap();
    app.assets
        .share_with_team(&creator, asset.id, team.id, &ctx())
        .await
        .unwrap();

    assert!(app.assets.get_asset(&member, asset.id).await.is_ok());
    assert!(matches!(
        app.assets.get_asset(&outsider, asset.id).await.unwrap_err(),
        ServiceError::Authorization(_)
    ));

    app.assets
        .unshare_team(&creator, asset.id, team.id, &ctx())
        .await
        .unwrap();
    assert!(app.assets.get_asset(&member, asset.id).await.is_err());
}

#[tokio::test]
async fn company_visibility_requires_matching_companies() {
    let app = common::setup().await;
    let company = common::seed_company(&app, "Contoso").await;
    let other_company = common::seed_company(&app, "Fabrikam").await;

    let creator = common::seed_user(&app, UserRole::ContentCreator, Some(company.id)).await;
    let colleague = common::seed_user(&app, UserRole::SeoSpecialist, Some(company.id)).await;
    let rival = common::seed_user(&app, UserRole::SeoSpecialist, Some(other_company.id)).await;
    let unaffiliated = common::seed_user(&app, UserRole::SeoSpecialist, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Company), &ctx())
        .await
        .unwrap();

    assert!(app.assets.get_asset(&colleague, asset.id).await.is_ok());
    assert!(app.assets.get_asset(&rival, asset.id).await.is_err());
    assert!(app.assets.get_asset(&unaffiliated, asset.id).await.is_err());
}

#[tokio::test]
async fn role_visibility_matches_the_allowed_role_exactly() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, None).await;
    let other_creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let mut request = create_request(Visibility::Role);
    request.allowed_role = Some(UserRole::SeoSpecialist);
    let asset = app.assets.create_asset(&creator, request, &ctx()).await.unwrap();

    assert!(app.assets.get_asset(&seo, asset.id).await.is_ok());
    assert!(app.assets.get_asset(&other_creator, asset.id).await.is_err());
}

#[tokio::test]
async fn listing_counts_only_what_each_caller_may_see() {
    let app = common::setup().await;
    let company = common::seed_company(&app, "Contoso").await;

    let creator = common::seed_user(&app, UserRole::ContentCreator, Some(company.id)).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, Some(company.id)).await;
    let outsider = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    for visibility in [
        Visibility::Public,
        Visibility::UploaderOnly,
        Visibility::Company,
        Visibility::AdminOnly,
    ] {
        app.assets
            .create_asset(&creator, create_request(visibility), &ctx())
            .await
            .unwrap();
    }
    let mut role_gated = create_request(Visibility::Role);
    role_gated.allowed_role = Some(UserRole::SeoSpecialist);
    app.assets.create_asset(&creator, role_gated, &ctx()).await.unwrap();

    let filter = AssetFilter::default();

    let (_, creator_total) = app.assets.list_assets(&creator, &filter, 1, 50).await.unwrap();
    assert_eq!(creator_total, 5, "uploaders see all of their own assets");

    let (_, admin_total) = app.assets.list_assets(&admin, &filter, 1, 50).await.unwrap();
    assert_eq!(admin_total, 5, "admins see everything");

    let (seo_assets, seo_total) = app.assets.list_assets(&seo, &filter, 1, 50).await.unwrap();
    assert_eq!(seo_total, 3, "public, same-company, and role-matched");
    assert!(seo_assets
        .iter()
        .all(|asset| asset.visibility != Visibility::UploaderOnly
            && asset.visibility != Visibility::AdminOnly));

    let (_, outsider_total) = app.assets.list_assets(&outsider, &filter, 1, 50).await.unwrap();
    assert_eq!(outsider_total, 1, "only the public asset");
}

#[tokio::test]
async fn visibility_changes_validate_the_role_pairing_and_audit() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::UploaderOnly), &ctx())
        .await
        .unwrap();

    let err = app
        .assets
        .set_visibility(
            &creator,
            asset.id,
            SetVisibilityRequest {
                visibility: Visibility::Role,
                allowed_role: None,
            },
            &ctx(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = app
        .assets
        .set_visibility(
            &creator,
            asset.id,
            SetVisibilityRequest {
                visibility: Visibility::Public,
                allowed_role: Some(UserRole::SeoSpecialist),
            },
            &ctx(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let updated = app
        .assets
        .set_visibility(
            &creator,
            asset.id,
            SetVisibilityRequest {
                visibility: Visibility::Role,
                allowed_role: Some(UserRole::SeoSpecialist),
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(updated.visibility, Visibility::Role);
    assert_eq!(updated.allowed_role, Some(UserRole::SeoSpecialist));

    let (entries, total) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Update),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(total, 1, "failed validations never reach the ledger");
    assert_eq!(entries[0].metadata["previous_visibility"], "UPLOADER_ONLY");
    assert_eq!(entries[0].metadata["new_visibility"], "ROLE");
}

#[tokio::test]
async fn sharing_with_unknown_targets_is_not_found() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::SelectedUsers), &ctx())
        .await
        .unwrap();

    let err = app
        .assets
        .share_with_user(&creator, asset.id, Uuid::new_v4(), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Database(DatabaseError::NotFound(_))));

    let err = app
        .assets
        .share_with_team(&creator, asset.id, Uuid::new_v4(), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Database(DatabaseError::NotFound(_))));
}

#[tokio::test]
async fn duplicate_grants_surface_as_duplicates() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::SelectedUsers), &ctx())
        .await
        .unwrap();

    app.assets
        .share_with_user(&creator, asset.id, seo.id, &ctx())
        .await
        .unwrap();
    let err = app
        .assets
        .share_with_user(&creator, asset.id, seo.id, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Database(DatabaseError::DuplicateEntry(_))
    ));
}

#[tokio::test]
async fn only_editors_manage_shares() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, None).await;
    let other = common::seed_user(&app, UserRole::SeoSpecialist, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::SelectedUsers), &ctx())
        .await
        .unwrap();

    let err = app
        .assets
        .share_with_user(&seo, asset.id, other.id, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let err = app.assets.list_shares(&seo, asset.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let shares = app.assets.list_shares(&creator, asset.id).await.unwrap();
    assert!(shares.users.is_empty());
    assert!(shares.teams.is_empty());
}

#[tokio::test]
async fn carousel_items_stay_dense_through_adds_moves_and_removals() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let asset = app
        .assets
        .create_asset(&creator, carousel_request(), &ctx())
        .await
        .unwrap();

    let mut ids = Vec::new();
    for slide in ["a", "b", "c"] {
        let item = app
            .assets
            .add_carousel_item(
                &creator,
                asset.id,
                NewCarouselItem {
                    file_key: format!("assets/slide-{slide}.png"),
                    caption: Some(format!("slide {slide}")),
                },
                &ctx(),
            )
            .await
            .unwrap();
        ids.push(item.id);
    }

    let items = app.assets.list_carousel_items(&creator, asset.id).await.unwrap();
    let positions: Vec<i64> = items.iter().map(|item| item.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    // bring the last slide to the front
    let reordered = app
        .assets
        .move_carousel_item(&creator, asset.id, ids[2], 0, &ctx())
        .await
        .unwrap();
    assert_eq!(reordered[0].id, ids[2]);
    assert_eq!(
        reordered.iter().map(|item| item.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    app.assets
        .remove_carousel_item(&creator, asset.id, ids[0], &ctx())
        .await
        .unwrap();
    let remaining = app.assets.list_carousel_items(&creator, asset.id).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert_eq!(
        remaining.iter().map(|item| item.position).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(remaining[0].id, ids[2]);
    assert_eq!(remaining[1].id, ids[1]);
}

#[tokio::test]
async fn carousel_mutations_are_editor_gated_and_kind_checked() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, None).await;

    let carousel = app
        .assets
        .create_asset(&creator, carousel_request(), &ctx())
        .await
        .unwrap();
    let image = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    let item = NewCarouselItem {
        file_key: "assets/slide.png".to_string(),
        caption: None,
    };

    let err = app
        .assets
        .add_carousel_item(&seo, carousel.id, item.clone(), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let err = app
        .assets
        .add_carousel_item(&creator, image.id, item, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}
