/// Authentication Routes
///
/// Thin HTTP adapter over `AuthService`: request binding, bearer extraction
/// and response shaping only.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthService, Claims, TokenKind};
use crate::error::AuthError;
use crate::middleware::bearer_token;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token refresh request; the access token travels in the Authorization header
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

/// POST /auth/login
///
/// # Errors
/// - 401: Unknown user or wrong password (same response for both)
/// - 429: Too many failed attempts
/// - 500: Store or cache unavailable
pub async fn login(
    form: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AuthError> {
    let tokens = auth.login(&form.username, &form.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: auth.codec().ttl(TokenKind::Access).as_secs(),
    }))
}

/// POST /auth/refresh
///
/// Requires `Authorization: Bearer <access_token>`; the access token may be
/// expired but must be within the refresh window.
///
/// # Errors
/// - 400: Access token is not close enough to expiry
/// - 403: Missing/invalid access token or invalid refresh token
/// - 500: Cache unavailable
pub async fn refresh(
    req: HttpRequest,
    form: web::Json<RefreshRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AuthError> {
    let access_token = bearer_token(req.headers()).ok_or(AuthError::InvalidToken)?;

    let access_token = auth.refresh(access_token, &form.refresh_token).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: auth.codec().ttl(TokenKind::Access).as_secs(),
    }))
}

/// GET /api/me
///
/// Claims are injected by `JwtMiddleware`.
pub async fn current_user(claims: web::ReqData<Claims>) -> HttpResponse {
    let claims = claims.into_inner();

    HttpResponse::Ok().json(UserResponse {
        id: claims.sub,
        username: claims.username,
    })
}
