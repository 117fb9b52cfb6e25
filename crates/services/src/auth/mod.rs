//! Session identity: JWT access/refresh tokens, password checks and the
//! per-session anti-forgery nonce.

pub mod nonce;
pub mod password;

use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sellerdesk_config::JwtSettings;
use sellerdesk_db::models::User;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use nonce::NonceService;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Password hash error: {0}")]
    HashError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

pub struct AuthService {
    jwt_settings: JwtSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(jwt_settings: JwtSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(jwt_settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(jwt_settings.secret.as_bytes());
        Self {
            jwt_settings,
            encoding_key,
            decoding_key,
        }
    }

    pub fn access_token_ttl_secs(&self) -> u64 {
        self.jwt_settings.access_token_ttl_secs
    }

    /// Issues an access/refresh pair for a user that has been persisted.
    pub fn generate_tokens(&self, user: &User) -> Result<TokenPair, AuthError> {
        let user_id = user.id.ok_or(AuthError::InvalidCredentials)?;

        let access_claims = self.claims_for(
            user_id,
            user,
            TokenType::Access,
            self.jwt_settings.access_token_ttl_secs,
        );
        let refresh_claims = self.claims_for(
            user_id,
            user,
            TokenType::Refresh,
            self.jwt_settings.refresh_token_ttl_secs,
        );

        Ok(TokenPair {
            access_token: self.sign(&access_claims)?,
            refresh_token: self.sign(&refresh_claims)?,
            expires_in: self.jwt_settings.access_token_ttl_secs,
        })
    }

    fn claims_for(&self, user_id: ObjectId, user: &User, token_type: TokenType, ttl_secs: u64) -> Claims {
        let now = Utc::now();
        Claims {
            sub: user_id.to_hex(),
            email: user.email.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
            iss: self.jwt_settings.issuer.clone(),
            token_type,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn verify_token(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.jwt_settings.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        if token_data.claims.token_type != expected {
            return Err(AuthError::InvalidToken(format!(
                "Expected a {expected:?} token"
            )));
        }
        Ok(token_data.claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_token(token, TokenType::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_token(token, TokenType::Refresh)
    }
}

impl Claims {
    pub fn user_id(&self) -> Result<ObjectId, AuthError> {
        ObjectId::parse_str(&self.sub)
            .map_err(|_| AuthError::InvalidToken("Invalid user ID in token".to_string()))
    }
}
