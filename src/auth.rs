use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

use crate::core::parse_user_id;
use crate::error::MatchError;
use crate::models::UserId;
use crate::routes::AppState;

/// Claims expected in caller tokens; `sub` carries the numeric user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 bearer token verifier
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Resolve the caller id from a raw token
    pub fn verify(&self, token: &str) -> Result<UserId, MatchError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            MatchError::Unauthorized
        })?;

        parse_user_id(Some(&data.claims.sub))
    }
}

/// Authenticated caller, extracted from `Authorization: Bearer <token>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
}

impl Caller {
    fn from_request_parts(req: &HttpRequest) -> Result<Self, MatchError> {
        let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
            tracing::error!("AppState missing from request; cannot authenticate");
            MatchError::Unauthorized
        })?;

        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(MatchError::Unauthorized)?;

        let id = state.verifier.verify(token)?;
        Ok(Caller { id })
    }
}

impl FromRequest for Caller {
    type Error = MatchError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_parts(req))
    }
}
