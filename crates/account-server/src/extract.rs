//! Guard extractors.
//!
//! Each protected handler names its requirement in its signature:
//!
//! ```rust,ignore
//! async fn delete_user(
//!     _auth: Authorized<CanDelete>,
//!     State(state): State<AppState>,
//!     Path(id): Path<i64>,
//! ) -> ApiResult<Json<Value>> { ... }
//! ```
//!
//! Put `Authorized<_>` first so the request is authenticated and authorized
//! before any other extractor or the handler body can reject it.

use account_auth::{AuthError, Principal};
use account_rbac::{Permission, Requirement, Role};
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::marker::PhantomData;

use crate::error::ApiError;
use crate::state::AppState;

/// A requirement known at compile time.
pub trait Guard: Send + Sync + 'static {
    fn requirement() -> Requirement;
}

/// Any authenticated user.
#[derive(Debug)]
pub struct AnyUser;

impl Guard for AnyUser {
    fn requirement() -> Requirement {
        Requirement::Authenticated
    }
}

/// `read` permission.
#[derive(Debug)]
pub struct CanRead;

impl Guard for CanRead {
    fn requirement() -> Requirement {
        Requirement::permission(Permission::Read)
    }
}

/// `write` permission.
#[derive(Debug)]
pub struct CanWrite;

impl Guard for CanWrite {
    fn requirement() -> Requirement {
        Requirement::permission(Permission::Write)
    }
}

/// `delete` permission.
#[derive(Debug)]
pub struct CanDelete;

impl Guard for CanDelete {
    fn requirement() -> Requirement {
        Requirement::permission(Permission::Delete)
    }
}

/// Admin role only.
#[derive(Debug)]
pub struct AdminOnly;

impl Guard for AdminOnly {
    fn requirement() -> Requirement {
        Requirement::any_role([Role::Admin])
    }
}

/// Admin or Moderator role.
#[derive(Debug)]
pub struct ModeratorOrAdmin;

impl Guard for ModeratorOrAdmin {
    fn requirement() -> Requirement {
        Requirement::any_role([Role::Admin, Role::Moderator])
    }
}

/// An authenticated caller that satisfies `G`.
#[derive(Debug)]
pub struct Authorized<G> {
    pub principal: Principal,
    _guard: PhantomData<fn() -> G>,
}

impl<G> Authorized<G> {
    pub fn into_principal(self) -> Principal {
        self.principal
    }
}

impl<G: Guard> FromRequestParts<AppState> for Authorized<G> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers);
        let principal = state.guard.authorize(token, &G::requirement()).await?;

        Ok(Authorized {
            principal,
            _guard: PhantomData,
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Any other shape yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// JSON request body whose rejections use the API error envelope.
///
/// A malformed or mistyped body is reported as `INVALID_INPUT` (422), never
/// as axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "rejected request body");
        ApiError(AuthError::InvalidInput(rejection.body_text()))
    }
}
