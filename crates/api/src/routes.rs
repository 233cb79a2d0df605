use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Current user
        .route(
            "/api/users/me",
            get(handlers::users::me)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Assets
        .route(
            "/api/assets",
            post(handlers::assets::create_asset)
                .get(handlers::assets::list_assets)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id",
            get(handlers::assets::get_asset)
                .put(handlers::assets::update_asset)
                .delete(handlers::assets::delete_asset)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Review workflow; approve/reject check the admin role in the service
        .route(
            "/api/assets/:id/submit",
            post(handlers::assets::submit_asset)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/resubmit",
            post(handlers::assets::resubmit_asset)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/approve",
            post(handlers::assets::approve_asset)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/reject",
            post(handlers::assets::reject_asset)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/visibility",
            put(handlers::assets::set_visibility)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/download",
            get(handlers::assets::download_asset)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Versions
        .route(
            "/api/assets/:id/versions",
            get(handlers::assets::list_versions)
                .post(handlers::assets::add_version)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Sharing
        .route(
            "/api/assets/:id/shares",
            get(handlers::assets::list_shares)
                .post(handlers::assets::share_with_user)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/shares/:user_id",
            delete(handlers::assets::unshare_user)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/team-shares",
            post(handlers::assets::share_with_team)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/team-shares/:team_id",
            delete(handlers::assets::unshare_team)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Carousel items
        .route(
            "/api/assets/:id/items",
            get(handlers::assets::list_items)
                .post(handlers::assets::add_item)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/items/:item_id/position",
            put(handlers::assets::move_item)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/assets/:id/items/:item_id",
            delete(handlers::assets::remove_item)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Admin surface
        .route(
            "/api/admin/review-queue",
            get(handlers::admin::review_queue)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/users",
            post(handlers::admin::create_user)
                .get(handlers::admin::list_users)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/users/:id/role",
            put(handlers::admin::set_role)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/users/:id/activate",
            post(handlers::admin::activate_user)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/users/:id/deactivate",
            post(handlers::admin::deactivate_user)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/companies",
            post(handlers::admin::create_company)
                .get(handlers::admin::list_companies)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/companies/:id",
            delete(handlers::admin::delete_company)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/teams",
            post(handlers::admin::create_team)
                .get(handlers::admin::list_teams)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/teams/:id/members",
            post(handlers::admin::add_team_member)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/admin/teams/:id/members/:user_id",
            delete(handlers::admin::remove_team_member)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        // Audit ledger (read-only, admin)
        .route(
            "/api/audit/logs",
            get(handlers::audit::list_audit_logs)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .route(
            "/api/audit/logs/:id",
            get(handlers::audit::get_audit_log)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_admin)),
        )
        .with_state(state)
}
