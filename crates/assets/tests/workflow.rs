mod common;

use dam_assets::{ApproveRequest, RejectRequest, ServiceError};
use dam_models::{
    AssetStatus, AuditAction, AuditLogFilter, AuditResourceType, UserRole, Visibility,
};

use common::{create_request, ctx};

#[tokio::test]
async fn creating_an_asset_records_version_one_and_an_upload_entry() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    assert_eq!(asset.status, AssetStatus::Draft);
    assert_eq!(asset.current_version, 1);
    assert_eq!(asset.uploader_id, creator.id);

    let versions = app.assets.list_versions(&creator, asset.id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version_number, 1);
    assert_eq!(versions[0].file_key, asset.file_key);

    let (entries, total) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Upload),
                resource_type: Some(AuditResourceType::Asset),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(entries[0].user_id, creator.id);
    assert_eq!(entries[0].resource_id, Some(asset.id));
    assert_eq!(entries[0].metadata["version_number"], 1);
    assert_eq!(entries[0].ip_address.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn defaulted_visibility_keeps_new_uploads_private() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let mut request = create_request(Visibility::Public);
    request.visibility = None;

    let asset = app.assets.create_asset(&creator, request, &ctx()).await.unwrap();
    assert_eq!(asset.visibility, Visibility::UploaderOnly);
}

#[tokio::test]
async fn submitting_moves_drafts_into_review_and_audits_the_approval() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    let submitted = app
        .assets
        .submit_for_review(&creator, asset.id, &ctx())
        .await
        .unwrap();
    assert_eq!(submitted.status, AssetStatus::PendingReview);

    let (entries, total) = app
        .ledger
        .list(
            &AuditLogFilter {
                resource_type: Some(AuditResourceType::Approval),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(entries[0].action, AuditAction::Create);
    assert_eq!(entries[0].resource_id, Some(asset.id));
    assert_eq!(entries[0].metadata["previous_status"], "DRAFT");
    assert_eq!(entries[0].metadata["new_status"], "PENDING_REVIEW");
}

#[tokio::test]
async fn approval_commits_the_status_and_exactly_one_audit_entry() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();
    app.assets.submit_for_review(&creator, asset.id, &ctx()).await.unwrap();

    let approved = app
        .assets
        .approve(&admin, asset.id, ApproveRequest::default(), &ctx())
        .await
        .unwrap();
    assert_eq!(approved.status, AssetStatus::Approved);

    let (entries, total) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Approve),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 1, "exactly one entry per transition");
    assert_eq!(entries[0].user_id, admin.id);
    assert_eq!(entries[0].resource_id, Some(asset.id));
    assert_eq!(entries[0].metadata["previous_status"], "PENDING_REVIEW");
    assert_eq!(entries[0].metadata["new_status"], "APPROVED");
}

#[tokio::test]
async fn approval_can_retarget_visibility_in_the_same_transaction() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::UploaderOnly), &ctx())
        .await
        .unwrap();
    app.assets.submit_for_review(&creator, asset.id, &ctx()).await.unwrap();

    let approved = app
        .assets
        .approve(
            &admin,
            asset.id,
            ApproveRequest {
                new_visibility: Some(Visibility::Role),
                allowed_role: Some(UserRole::SeoSpecialist),
            },
            &ctx(),
        )
        .await
        .unwrap();

    assert_eq!(approved.status, AssetStatus::Approved);
    assert_eq!(approved.visibility, Visibility::Role);
    assert_eq!(approved.allowed_role, Some(UserRole::SeoSpecialist));

    let (entries, _) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Approve),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(entries[0].metadata["new_visibility"], "ROLE");
}

#[tokio::test]
async fn non_admins_cannot_approve_or_reject() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();
    app.assets.submit_for_review(&creator, asset.id, &ctx()).await.unwrap();

    let err = app
        .assets
        .approve(&seo, asset.id, ApproveRequest::default(), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let err = app
        .assets
        .reject(&creator, asset.id, RejectRequest::default(), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    // no state change, no review entries
    let unchanged = app.assets.get_asset(&creator, asset.id).await.unwrap();
    assert_eq!(unchanged.status, AssetStatus::PendingReview);

    for action in [AuditAction::Approve, AuditAction::Reject] {
        let (_, total) = app
            .ledger
            .list(
                &AuditLogFilter {
                    action: Some(action),
                    ..Default::default()
                },
                1,
                10,
            )
            .await
            .unwrap();
        assert_eq!(total, 0);
    }
}

#[tokio::test]
async fn approving_a_draft_is_a_conflict() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    let err = app
        .assets
        .approve(&admin, asset.id, ApproveRequest::default(), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let unchanged = app.assets.get_asset(&creator, asset.id).await.unwrap();
    assert_eq!(unchanged.status, AssetStatus::Draft);
}

#[tokio::test]
async fn rejection_records_the_reason_and_allows_resubmission() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();
    app.assets.submit_for_review(&creator, asset.id, &ctx()).await.unwrap();

    let rejected = app
        .assets
        .reject(
            &admin,
            asset.id,
            RejectRequest {
                reason: Some("logo is outdated".to_string()),
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, AssetStatus::Rejected);

    let (entries, _) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Reject),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(entries[0].metadata["reason"], "logo is outdated");

    // rework and try again
    let resubmitted = app.assets.resubmit(&creator, asset.id, &ctx()).await.unwrap();
    assert_eq!(resubmitted.status, AssetStatus::PendingReview);

    let (entries, _) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Update),
                resource_type: Some(AuditResourceType::Approval),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].metadata["previous_status"], "REJECTED");

    let approved = app
        .assets
        .approve(&admin, asset.id, ApproveRequest::default(), &ctx())
        .await
        .unwrap();
    assert_eq!(approved.status, AssetStatus::Approved);
}

#[tokio::test]
async fn audit_append_failure_rolls_back_the_approval() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();
    app.assets.submit_for_review(&creator, asset.id, &ctx()).await.unwrap();

    // break the ledger underneath the service
    sqlx::query("DROP TABLE audit_logs")
        .execute(app.db.pool())
        .await
        .unwrap();

    let err = app
        .assets
        .approve(&admin, asset.id, ApproveRequest::default(), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Database(_)));

    // the status flip rolled back with the failed append
    let unchanged = app.assets.get_asset(&creator, asset.id).await.unwrap();
    assert_eq!(unchanged.status, AssetStatus::PendingReview);
}

#[tokio::test]
async fn submitting_requires_edit_rights() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let other = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    let err = app
        .assets
        .submit_for_review(&other, asset.id, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let unchanged = app.assets.get_asset(&creator, asset.id).await.unwrap();
    assert_eq!(unchanged.status, AssetStatus::Draft);
}

#[tokio::test]
async fn deleting_an_asset_detaches_its_ledger_references() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();
    app.assets.submit_for_review(&creator, asset.id, &ctx()).await.unwrap();
    app.assets
        .approve(&admin, asset.id, ApproveRequest::default(), &ctx())
        .await
        .unwrap();

    app.assets.delete_asset(&creator, asset.id, &ctx()).await.unwrap();

    // UPLOAD + submit CREATE + APPROVE + DELETE all survive the delete
    let (entries, total) = app.ledger.list(&AuditLogFilter::default(), 1, 50).await.unwrap();
    assert_eq!(total, 4);
    assert!(entries.iter().all(|entry| entry.resource_id.is_none()));

    let (_, by_resource) = app
        .ledger
        .list(
            &AuditLogFilter {
                resource_id: Some(asset.id),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(by_resource, 0);

    let err = app.assets.get_asset(&creator, asset.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn downloads_are_gated_on_approval_for_non_editors() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let seo = common::seed_user(&app, UserRole::SeoSpecialist, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    let err = app.assets.download(&seo, asset.id, &ctx()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    // the uploader can always pull their own file
    let grant = app.assets.download(&creator, asset.id, &ctx()).await.unwrap();
    assert!(grant.download_url.ends_with(&asset.file_key));
    assert_eq!(grant.version_number, 1);

    app.assets.submit_for_review(&creator, asset.id, &ctx()).await.unwrap();
    app.assets
        .approve(&admin, asset.id, ApproveRequest::default(), &ctx())
        .await
        .unwrap();

    app.assets.download(&seo, asset.id, &ctx()).await.unwrap();

    let (_, downloads) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Download),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(downloads, 2);
}

#[tokio::test]
async fn review_queue_is_admin_only_and_oldest_first() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;
    let admin = common::seed_user(&app, UserRole::Admin, None).await;

    let first = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();
    let second = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    app.assets.submit_for_review(&creator, first.id, &ctx()).await.unwrap();
    app.assets.submit_for_review(&creator, second.id, &ctx()).await.unwrap();

    let err = app.assets.review_queue(&creator, 1, 10).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let (queue, total) = app.assets.review_queue(&admin, 1, 10).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(queue[0].id, first.id, "earliest submission leads the queue");
    assert_eq!(queue[1].id, second.id);
}

#[tokio::test]
async fn new_versions_bump_the_asset_file_and_audit_an_upload() {
    let app = common::setup().await;
    let creator = common::seed_user(&app, UserRole::ContentCreator, None).await;

    let asset = app
        .assets
        .create_asset(&creator, create_request(Visibility::Public), &ctx())
        .await
        .unwrap();

    let version = app
        .assets
        .add_version(
            &creator,
            asset.id,
            dam_models::asset::NewAssetVersion {
                file_key: "assets/banner-v2.png".to_string(),
                file_name: "banner-v2.png".to_string(),
                content_type: Some("image/png".to_string()),
                size_bytes: Some(4096),
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(version.version_number, 2);

    let refreshed = app.assets.get_asset(&creator, asset.id).await.unwrap();
    assert_eq!(refreshed.current_version, 2);
    assert_eq!(refreshed.file_key, "assets/banner-v2.png");

    let (_, uploads) = app
        .ledger
        .list(
            &AuditLogFilter {
                action: Some(AuditAction::Upload),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(uploads, 2, "initial upload plus the new version");
}
