//! HTTP endpoints for the authentication API
//!
//! Boundary collapse: every credential or token failure leaves this layer as
//! the same 401 body, so responses cannot be used for username enumeration.
//! Storage failures are a 503 and are never reported as an auth rejection.

use std::convert::Infallible;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::service::{AuthService, Identity};
use crate::auth::token::extract_bearer_token;
use crate::error::KeygateError;

/// Request body limit for all endpoints
const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public view of a credential record; never includes the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Rejection wrapper carrying the service error to the recovery handler
#[derive(Debug)]
struct ApiError(KeygateError);

impl warp::reject::Reject for ApiError {}

/// Build the full route tree for the auth API
pub fn routes(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let login = warp::path!("login")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service(service.clone()))
        .and_then(handle_login);

    let register = warp::path!("register")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service(service.clone()))
        .and_then(handle_register);

    let me = warp::path!("me")
        .and(warp::get())
        .and(with_identity(service.clone()))
        .and_then(handle_me);

    let change_password = warp::path!("me" / "password")
        .and(warp::post())
        .and(with_identity(service.clone()))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service(service))
        .and_then(handle_change_password);

    let health = warp::path!("health").and(warp::get()).map(|| "OK");

    login
        .or(register)
        .or(change_password)
        .or(me)
        .or(health)
        .recover(handle_rejection)
        .map(|reply| crate::security::with_api_security_headers(reply))
}

fn with_service(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (Arc<AuthService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// Resolve the caller's identity from the Authorization header
fn with_identity(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (Identity,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(with_service(service))
        .and_then(|header: Option<String>, service: Arc<AuthService>| async move {
            let token = header
                .as_deref()
                .and_then(extract_bearer_token)
                .ok_or_else(|| warp::reject::custom(ApiError(KeygateError::TokenInvalid)))?;

            service
                .resolve(&token)
                .await
                .map_err(|e| warp::reject::custom(ApiError(e)))
        })
}

async fn handle_login(
    request: LoginRequest,
    service: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    match service.login(&request.username, &request.password).await {
        Ok(token) => Ok(warp::reply::with_status(
            warp::reply::json(&token),
            StatusCode::OK,
        )),
        Err(e) => Err(warp::reject::custom(ApiError(e))),
    }
}

async fn handle_register(
    request: RegisterRequest,
    service: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    match service
        .register(&request.username, &request.email, &request.password)
        .await
    {
        Ok(record) => Ok(warp::reply::with_status(
            warp::reply::json(&UserResponse {
                username: record.username,
                email: record.email,
            }),
            StatusCode::CREATED,
        )),
        Err(e) => Err(warp::reject::custom(ApiError(e))),
    }
}

async fn handle_me(identity: Identity) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&IdentityResponse {
        username: identity.username,
    }))
}

async fn handle_change_password(
    identity: Identity,
    request: ChangePasswordRequest,
    service: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    match service
        .change_password(
            &identity.username,
            &request.current_password,
            &request.new_password,
        )
        .await
    {
        Ok(()) => Ok(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT)),
        Err(e) => Err(warp::reject::custom(ApiError(e))),
    }
}

/// Map rejections to JSON error responses
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(ApiError(e)) = err.find::<ApiError>() {
        match e {
            // SECURITY: one indistinguishable message for every credential
            // and token failure
            KeygateError::UserNotFound(_)
            | KeygateError::BadCredentials
            | KeygateError::TokenInvalid
            | KeygateError::TokenExpired => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            KeygateError::StorageError(_) | KeygateError::StorageTimeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service unavailable".to_string(),
            ),
            KeygateError::UserExists(_) => {
                (StatusCode::CONFLICT, "username already taken".to_string())
            }
            KeygateError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => {
                log::error!("Internal error while handling request: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        }
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "invalid request body".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    let body = warp::reply::json(&ErrorResponse { error: message });
    Ok(warp::reply::with_status(body, code))
}
