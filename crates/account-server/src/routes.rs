//! HTTP routes.
//!
//! Handlers only translate between JSON and the account core. Every
//! protected handler takes its `Authorized<_>` guard as the first argument.

use account_auth::accounts::{Credentials, ProfileUpdate, Registration};
use account_auth::{UserId, UserProfile};
use account_rbac::Role;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::ApiResult;
use crate::extract::{
    AdminOnly, AnyUser, ApiJson, Authorized, CanDelete, CanRead, CanWrite, ModeratorOrAdmin,
};
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/admin-only", get(admin_only))
        .route("/moderator-or-admin", get(moderator_or_admin))
        .route("/check-permission/{permission}", get(check_permission))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub message: &'static str,
}

/// Current user with resolved role.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub role: Role,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Registration>,
) -> ApiResult<Json<Value>> {
    let user_id = state.accounts.register(payload).await?;
    Ok(Json(json!({ "message": "Registered", "user_id": user_id })))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state.accounts.login(payload).await?;

    Ok(Json(LoginResponse {
        access_token: session.access_token,
        token_type: session.token_type,
        expires_in: session.expires_in,
        user_id: session.user.id,
        email: session.user.email,
        role: session.role,
        message: "Login successful",
    }))
}

async fn me(auth: Authorized<AnyUser>) -> Json<MeResponse> {
    let principal = auth.into_principal();
    Json(MeResponse {
        profile: principal.user.profile(),
        role: principal.role,
    })
}

async fn list_users(
    _auth: Authorized<CanRead>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(state.accounts.list().await?))
}

async fn get_user(
    _auth: Authorized<CanRead>,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.accounts.get(id).await?))
}

async fn update_user(
    _auth: Authorized<CanWrite>,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ApiJson(payload): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<Value>> {
    state.accounts.update(id, payload).await?;
    Ok(Json(json!({ "message": "Updated" })))
}

async fn delete_user(
    _auth: Authorized<CanDelete>,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<Value>> {
    state.accounts.delete(id).await?;
    Ok(Json(json!({ "message": "Deleted" })))
}

async fn admin_only(auth: Authorized<AdminOnly>) -> Json<Value> {
    Json(json!({
        "message": "Admin access granted",
        "user": auth.principal.email()
    }))
}

async fn moderator_or_admin(auth: Authorized<ModeratorOrAdmin>) -> Json<Value> {
    Json(json!({
        "message": "Moderator/Admin access granted",
        "user": auth.principal.email()
    }))
}

async fn check_permission(
    auth: Authorized<CanRead>,
    State(state): State<AppState>,
    Path(permission): Path<String>,
) -> Json<Value> {
    let principal = auth.into_principal();
    let has_permission = state
        .guard
        .permissions()
        .check_named(principal.role, &permission);

    Json(json!({
        "user": principal.email(),
        "role": principal.role,
        "permission": permission,
        "has_permission": has_permission
    }))
}
