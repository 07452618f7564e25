//! Caller identity for every job operation.
//!
//! `Identity` is an actix extractor: handlers that take it as an argument are
//! only reached with a valid `Authorization: Bearer <jwt>` header. The signing
//! keys must be registered as `web::Data<JwtKeys>`.

use std::fmt;

use actix_web::{
    dev::Payload, http::header::AUTHORIZATION, http::StatusCode, web, FromRequest, HttpRequest,
    HttpResponse, ResponseError,
};
use chrono::{Duration, Utc};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    /// Demo accounts may read but not modify
    pub test_user: bool,
}

#[cfg(test)]
impl Identity {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            test_user: false,
        }
    }

    pub fn demo(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            test_user: true,
        }
    }
}

/// Authentication failures
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header
    MissingToken,

    /// Header is not `Bearer <token>`
    InvalidFormat,

    /// Bad signature, wrong algorithm, or undecodable claims
    InvalidToken(String),

    Expired,

    /// Token has an empty subject
    MissingSubject,

    /// `JwtKeys` were not registered with the app
    MissingKeys,

    /// Signing a new token failed
    Signing(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing bearer token"),
            AuthError::InvalidFormat => {
                write!(f, "Invalid authorization format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::Expired => write!(f, "Token has expired"),
            AuthError::MissingSubject => write!(f, "Token has no subject"),
            AuthError::MissingKeys => write!(f, "Token keys are not configured"),
            AuthError::Signing(msg) => write!(f, "Failed to sign token: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingKeys | AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => {
                warn!("Authentication failed: {}", self);
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "Authentication invalid".to_string(),
                    fields: serde_json::json!({"message": self.to_string()}),
                })
            }
            status => {
                error!("Authentication misconfigured: {}", self);
                HttpResponse::build(status).json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Authentication unavailable"}),
                })
            }
        }
    }
}

/// Bearer token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    #[serde(default)]
    pub test_user: bool,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys derived from one shared secret
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 60;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: &str, test_user: bool, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            test_user,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }

        Ok(Identity {
            user_id: claims.sub,
            test_user: claims.test_user,
        })
    }
}

/// Pull the token out of an Authorization header value
pub fn extract_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn identify(req: &HttpRequest) -> Result<Identity, AuthError> {
    let keys = req
        .app_data::<web::Data<JwtKeys>>()
        .ok_or(AuthError::MissingKeys)?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    keys.verify(extract_token(header)?)
}

impl FromRequest for Identity {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identify(req))
    }
}
