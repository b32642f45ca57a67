use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{AuthContext, authenticate, require_admin, require_user},
        session::SESSION_COOKIE,
    },
    app_error::AppResult,
    application::jwt::IdentityClaim,
    domain::entities::user::{User, UserProfile, UserSummary},
};

#[derive(Deserialize)]
struct SignupPayload {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    success: bool,
    message: &'static str,
    token: String,
    user: UserSummary,
}

#[derive(Serialize)]
struct ProfileResponse {
    success: bool,
    user: UserProfile,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct RoleCheckResponse {
    success: bool,
    message: &'static str,
    user: IdentityClaim,
}

pub fn router(app_state: &AppState) -> Router<AppState> {
    let user_only = Router::new()
        .route("/user/check", get(user_check))
        .route_layer(from_fn(require_user));
    let admin_only = Router::new()
        .route("/admin/check", get(admin_check))
        .route_layer(from_fn(require_admin));

    let protected = Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout))
        .merge(user_only)
        .merge(admin_only)
        .route_layer(from_fn_with_state(app_state.clone(), authenticate));

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .merge(protected)
}

async fn signup(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .signup(&payload.name, &payload.email, &payload.password)
        .await?;
    let (jar, body) = start_session(&app_state, jar, &user, "Account created")?;
    Ok((StatusCode::CREATED, jar, body))
}

async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;
    let (jar, body) = start_session(&app_state, jar, &user, "Logged in")?;
    Ok((StatusCode::OK, jar, body))
}

async fn me(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> AppResult<impl IntoResponse> {
    let user = app_state.auth_use_cases.profile(ctx.user_id()).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: UserProfile::from(&user),
    }))
}

/// The token itself stays valid until expiry; clients must drop their copy.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let expired = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();
    (
        jar.add(expired),
        Json(MessageResponse {
            success: true,
            message: "Logged out",
        }),
    )
}

async fn user_check(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(RoleCheckResponse {
        success: true,
        message: "User route accessed successfully",
        user: ctx.claim,
    })
}

async fn admin_check(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(RoleCheckResponse {
        success: true,
        message: "Admin route accessed successfully",
        user: ctx.claim,
    })
}

/// Issues a token and delivers it both in the body and as the session cookie.
fn start_session(
    app_state: &AppState,
    jar: CookieJar,
    user: &User,
    message: &'static str,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    let codec = &app_state.token_codec;
    let token = codec.issue(&codec.claim_for(user.id, user.role))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .http_only(true)
        .secure(app_state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(codec.ttl())
        .build();

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            success: true,
            message,
            token,
            user: UserSummary::from(user),
        }),
    ))
}
