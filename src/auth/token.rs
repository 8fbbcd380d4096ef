use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::constants::BEARER_TOKEN_TYPE;
use crate::error::{KeygateError, Result};

/// JWT claims embedded in issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
    /// Not before (as UTC timestamp)
    pub nbf: usize,
}

impl Claims {
    /// Creates claims for a username with an explicit issuance time
    pub fn new(username: String, issued_at: usize, ttl: Duration) -> Self {
        Self {
            sub: username,
            exp: issued_at + ttl.as_secs() as usize,
            iat: issued_at,
            nbf: issued_at,
        }
    }

    /// Check if the claims are past their expiration time
    pub fn is_expired(&self) -> bool {
        unix_now() > self.exp
    }
}

/// Current time as a UTC unix timestamp
pub fn unix_now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as usize
}

/// Signed bearer token handed to clients after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Issues and validates signed bearer tokens
///
/// Stateless: token validity is entirely determined by signature and expiry,
/// never by server-side session state.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Creates a new issuer from the signing secret and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: expiry boundaries are exact
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issues a token for the given username, expiring TTL from now
    pub fn issue(&self, username: &str) -> Result<AccessToken> {
        self.issue_at(username, unix_now())
    }

    /// Issues a token with an explicit issuance time
    pub fn issue_at(&self, username: &str, issued_at: usize) -> Result<AccessToken> {
        let claims = Claims::new(username.to_string(), issued_at, self.ttl);
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| KeygateError::AuthError(format!("Failed to generate token: {}", e)))?;

        Ok(AccessToken {
            access_token: token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        })
    }

    /// Validates a token string and recovers its claims
    ///
    /// Distinguishes a correctly signed but expired token (`TokenExpired`)
    /// from anything malformed, unsigned, or signed with a different key
    /// (`TokenInvalid`).
    pub fn validate(&self, token: &str) -> Result<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(KeygateError::TokenExpired),
                _ => Err(KeygateError::TokenInvalid),
            },
        }
    }
}

/// Extracts the bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}
