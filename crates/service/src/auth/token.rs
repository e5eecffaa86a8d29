//! JWT issuance and validation (HS256).
//!
//! Access and refresh tokens share the claim shape; `token_type`
//! distinguishes them so a refresh token can never pass as an access token.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// username
    pub sub: String,
    /// user id
    pub uid: String,
    /// role (user_type)
    pub role: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn is_access(&self) -> bool { self.token_type == TOKEN_TYPE_ACCESS }
    pub fn is_refresh(&self) -> bool { self.token_type == TOKEN_TYPE_REFRESH }
}

/// Expiry windows for the two token kinds.
#[derive(Debug, Clone, Copy)]
pub struct TokenWindows {
    pub access_minutes: i64,
    pub refresh_days: i64,
}

impl Default for TokenWindows {
    fn default() -> Self { Self { access_minutes: 30, refresh_days: 7 } }
}

fn build_claims(username: &str, uid: &str, role: &str, token_type: &str, ttl: chrono::Duration) -> Claims {
    let now = chrono::Utc::now();
    Claims {
        sub: username.to_string(),
        uid: uid.to_string(),
        role: role.to_string(),
        token_type: token_type.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    }
}

pub fn issue_access_token(
    secret: &str,
    username: &str,
    uid: &str,
    role: &str,
    windows: TokenWindows,
) -> Result<String, AuthError> {
    let claims = build_claims(username, uid, role, TOKEN_TYPE_ACCESS, chrono::Duration::minutes(windows.access_minutes));
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

pub fn issue_refresh_token(
    secret: &str,
    username: &str,
    uid: &str,
    role: &str,
    windows: TokenWindows,
) -> Result<String, AuthError> {
    let claims = build_claims(username, uid, role, TOKEN_TYPE_REFRESH, chrono::Duration::days(windows.refresh_days));
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Decode and validate a token, including expiry.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips() {
        let secret = "test-secret";
        let tok = issue_access_token(secret, "budi", "uid-1", "dosen", TokenWindows::default()).unwrap();
        let claims = decode_token(secret, &tok).unwrap();
        assert_eq!(claims.sub, "budi");
        assert_eq!(claims.role, "dosen");
        assert!(claims.is_access());
        assert!(!claims.is_refresh());
    }

    #[test]
    fn refresh_token_is_marked_as_refresh() {
        let secret = "test-secret";
        let tok = issue_refresh_token(secret, "budi", "uid-1", "dosen", TokenWindows::default()).unwrap();
        let claims = decode_token(secret, &tok).unwrap();
        assert!(claims.is_refresh());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let tok = issue_access_token("secret-a", "budi", "uid-1", "admin", TokenWindows::default()).unwrap();
        assert!(decode_token("secret-b", &tok).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let windows = TokenWindows { access_minutes: -5, refresh_days: 7 };
        let tok = issue_access_token("s", "budi", "uid-1", "admin", windows).unwrap();
        assert!(decode_token("s", &tok).is_err());
    }
}
