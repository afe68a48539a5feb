//! # Bearer tokens
//!
//! `/api/login` hands out an HS256 JWT whose claims name the user (`sub` = user id,
//! `username`) and expire one hour after issue. Mutating blog routes take an
//! [`AuthUser`] argument, which pulls the token out of `Authorization: Bearer …`
//! and verifies it against the server's [`TokenKeys`].
//!
//! There is no server-side session table: a token stays valid until it expires,
//! and logging out only forgets it on the client.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use store::User;
use tracing::warn;

use crate::error::ApiError;

/// How long an issued token stays valid.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: u64,
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Keys from 32 random bytes. Tokens die with the process.
    pub fn random() -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::new(&secret)
    }

    /// Keys from the configured `SECRET`, or random ones with a warning when unset.
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(secret) => Self::new(secret.as_bytes()),
            None => {
                warn!("SECRET not set, login tokens will not survive a restart");
                Self::random()
            }
        }
    }

    /// Sign a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let exp = (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            exp: exp.max(0) as u64,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("token invalid".to_string()))
    }
}

/// The caller of a mutating route, as named by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("token missing".to_string()))?;
        let claims = TokenKeys::from_ref(state).verify(token)?;
        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
