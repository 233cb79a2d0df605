use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use dam_database::DatabaseError;
use dam_models::{RequestContext, User, UserRole};
use std::sync::Arc;
use uuid::Uuid;

use crate::handlers::ErrorResponse;
use crate::AppState;

/// Authenticated user context, loaded fresh from the database on every
/// request. The row is authoritative for role and activation state; the
/// token only establishes identity.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// Extract the JWT from the Authorization header
pub fn extract_bearer_token(
    headers: &HeaderMap,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "missing_auth_header",
                    "Authorization header is required",
                )),
            )
        })?
        .to_str()
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "invalid_auth_header",
                    "Invalid Authorization header format",
                )),
            )
        })?;

    if !auth_header.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "invalid_auth_scheme",
                "Authorization header must use Bearer scheme",
            )),
        ));
    }

    Ok(auth_header[7..].to_string())
}

/// Validate the token and load the matching account
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<User, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer_token(headers)?;

    let claims = state.jwt.validate_access_token(&token).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("invalid_token", &e.to_string())),
        )
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "invalid_token",
                "Token subject is not a user id",
            )),
        )
    })?;

    let user = state.users.find_by_id(user_id).await.map_err(|e| match e {
        DatabaseError::NotFound(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "unknown_user",
                "No account matches this token",
            )),
        ),
        other => {
            tracing::error!("Account lookup failed during authentication: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "database_error",
                    "Could not load the account",
                )),
            )
        }
    })?;

    if !user.is_active {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "account_disabled",
                "This account has been deactivated",
            )),
        ));
    }

    if !user.is_activated {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "account_not_activated",
                "This account has not been activated yet",
            )),
        ));
    }

    Ok(user)
}

/// Middleware to require authentication
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let user = authenticate(&state, &headers).await?;

    request.extensions_mut().insert(AuthUser { user });

    Ok(next.run(request).await)
}

/// Middleware to require the admin role
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let user = authenticate(&state, &headers).await?;

    if user.role != UserRole::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(
                "insufficient_permissions",
                "This action requires the admin role",
            )),
        ));
    }

    request.extensions_mut().insert(AuthUser { user });

    Ok(next.run(request).await)
}

/// Client metadata recorded alongside audited actions
pub fn client_context(headers: &HeaderMap) -> RequestContext {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|h| h.to_str().ok()))
        .map(|s| s.trim().to_string());

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    RequestContext {
        ip_address,
        user_agent,
    }
}
