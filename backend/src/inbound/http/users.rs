//! User account API handlers.
//!
//! ```text
//! POST /users/signup            register a local identity
//! POST /users/login             credentials in body or Basic header
//! GET  /users/logout            destroy the server-side session
//! GET  /users/checkToken        bearer-token diagnostic
//! GET  /users/oauth/callback    provider access token -> bearer token
//! ```

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::identity::SignupValidationError;
use crate::domain::{
    Error, ErrorCode, LoginCredentials, LoginValidationError, SignupDraft,
};
use crate::inbound::http::auth::{authorization_header, bearer_token};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Signup request body for `POST /users/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SignupRequest {
    /// Desired unique name.
    pub username: String,
    /// Raw password; hashed before it is stored.
    pub password: String,
    /// Optional given name.
    #[serde(default)]
    pub firstname: Option<String>,
    /// Optional family name.
    #[serde(default)]
    pub lastname: Option<String>,
}

/// Login request body for `POST /users/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Unique name.
    pub username: String,
    /// Raw password.
    pub password: String,
}

fn map_signup_validation_error(err: SignupValidationError) -> Error {
    match err {
        SignupValidationError::EmptyUsername => {
            Error::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        SignupValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new local identity.
#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Registration succeeded"),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let draft =
        SignupDraft::try_from_parts(&body.username, &body.password, body.firstname, body.lastname)
            .map_err(map_signup_validation_error)?;
    let identity = state.accounts.signup(draft).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Registration Successful!",
        "user": identity.profile(),
    })))
}

/// Authenticate and receive a bearer token plus a session cookie.
///
/// Credentials come from the JSON body when one is supplied, otherwise from
/// an `Authorization: Basic` header; a missing or malformed Basic header is
/// answered with a `WWW-Authenticate: Basic` challenge.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded; bearer token in body, session id in cookie",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid credentials",
            headers(("WWW-Authenticate" = String, description = "Basic challenge"))),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    payload: Option<web::Json<LoginRequest>>,
) -> ApiResult<HttpResponse> {
    let identity = match payload {
        Some(body) => {
            let body = body.into_inner();
            let credentials = LoginCredentials::try_from_parts(&body.username, &body.password)
                .map_err(map_login_validation_error)?;
            state.accounts.verify_credentials(&credentials).await?
        }
        None => {
            state
                .accounts
                .verify_basic(authorization_header(&req))
                .await?
        }
    };
    let session_id = state.accounts.begin_session(&identity).await?;
    session.persist(&session_id)?;
    let token = state.accounts.issue_token(&identity.id)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Login Successful!",
        "token": token,
    })))
}

/// Destroy the caller's server-side session.
#[utoipa::path(
    get,
    path = "/users/logout",
    responses(
        (status = 200, description = "Session destroyed"),
        (status = 401, description = "No session context"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[get("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let Some(session_id) = session.session_id()? else {
        return Err(Error::unauthorized("you are not logged in")
            .with_details(json!({ "code": "not_logged_in" }))
            .into());
    };
    state.accounts.end_session(&session_id).await?;
    session.clear();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "You are successfully logged out!",
    })))
}

/// Report bearer-token validity plus the resolved identity.
///
/// Never mutates any state; an invalid token is a diagnostic outcome, not
/// an internal fault.
#[utoipa::path(
    get,
    path = "/users/checkToken",
    responses(
        (status = 200, description = "Token valid; resolved identity in body"),
        (status = 401, description = "Token missing, malformed, expired, or orphaned"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "checkToken"
)]
#[get("/checkToken")]
pub async fn check_token(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let outcome = match bearer_token(&req) {
        Ok(token) => state.accounts.resolve_bearer(&token).await,
        Err(err) => Err(err),
    };
    match outcome {
        Ok(identity) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "status": "Token valid",
            "user": identity.profile(),
        }))),
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            Ok(HttpResponse::Unauthorized().json(json!({
                "success": false,
                "status": "Token invalid",
            })))
        }
        Err(err) => Err(err.into()),
    }
}

/// Provider access token carried on the OAuth callback.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OAuthCallbackQuery {
    /// Access token obtained from the provider by the client.
    pub access_token: String,
}

/// Exchange a provider access token for a local identity and bearer token.
#[utoipa::path(
    get,
    path = "/users/oauth/callback",
    params(OAuthCallbackQuery),
    responses(
        (status = 200, description = "Exchange succeeded; bearer token in body"),
        (status = 401, description = "Provider rejected the token or was unreachable"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "oauthCallback",
    security([])
)]
#[get("/oauth/callback")]
pub async fn oauth_callback(
    state: web::Data<HttpState>,
    query: web::Query<OAuthCallbackQuery>,
) -> ApiResult<HttpResponse> {
    let identity = state.accounts.oauth_exchange(&query.access_token).await?;
    let token = state.accounts.issue_token(&identity.id)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Login Successful!",
        "token": token,
    })))
}
