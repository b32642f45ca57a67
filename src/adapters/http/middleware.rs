use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::{
    adapters::http::session::{self, Candidate},
    app_error::{AppError, AppResult},
    application::jwt::{IdentityClaim, TokenCodec},
    domain::entities::role::Role,
};

/// Upper bound on a body buffered while looking for a `token` field.
pub const MAX_BUFFERED_BODY: usize = 1024 * 1024;

/// Identity established for the current request.
///
/// The claim is trusted as issued: a user demoted or deleted after issuance
/// keeps the old identity until the token expires.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claim: IdentityClaim,
}

impl AuthContext {
    pub fn user_id(&self) -> Uuid {
        self.claim.sub
    }

    pub fn role(&self) -> Role {
        self.claim.role
    }
}

/// Turns a located candidate into an identity.
pub fn verify_candidate(codec: &TokenCodec, candidate: Option<String>) -> AppResult<AuthContext> {
    let token = candidate.ok_or(AppError::TokenMissing)?;
    let claim = codec.verify(&token).map_err(|err| {
        tracing::debug!(reason = %err, "session token rejected");
        AppError::TokenInvalid
    })?;
    Ok(AuthContext { claim })
}

/// Authenticates the request and stores an `AuthContext` in its extensions.
///
/// The body is only read when neither header nor cookie supplied a token, and
/// is handed on unchanged.
pub async fn authenticate(
    State(codec): State<Arc<TokenCodec>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());

    let (candidate, mut request) = match session::from_headers(request.headers(), &jar) {
        Candidate::Token(token) => (Some(token), request),
        Candidate::Absent => (None, request),
        Candidate::CheckBody => {
            let (parts, body) = request.into_parts();
            // An oversized or unreadable body cannot hold a usable token.
            let bytes = to_bytes(body, MAX_BUFFERED_BODY).await.map_err(|err| {
                tracing::debug!(error = %err, "request body not searched for a token");
                AppError::TokenMissing
            })?;
            let candidate = session::body_token(&bytes);
            (candidate, Request::from_parts(parts, Body::from(bytes)))
        }
    };

    let context = verify_candidate(&codec, candidate)?;
    tracing::debug!(user_id = %context.user_id(), role = %context.role(), "request authenticated");

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Allows only an exact role match; there is no role hierarchy.
pub fn require_role(context: Option<&AuthContext>, required: Role) -> AppResult<()> {
    match context {
        Some(ctx) if ctx.role() == required => Ok(()),
        Some(ctx) => {
            tracing::debug!(user_id = %ctx.user_id(), role = %ctx.role(), required = %required, "role gate denied");
            Err(AppError::Forbidden)
        }
        None => Err(AppError::Forbidden),
    }
}

pub async fn require_user(request: Request, next: Next) -> Result<Response, AppError> {
    gate(Role::User, request, next).await
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    gate(Role::Admin, request, next).await
}

async fn gate(required: Role, request: Request, next: Next) -> Result<Response, AppError> {
    require_role(request.extensions().get::<AuthContext>(), required)?;
    Ok(next.run(request).await)
}
