//! JWT token management

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::AuthError;

/// Token lifetime used when the caller does not pass one
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// JWT claim set
///
/// Arbitrary claims are carried through unchanged; the codec only owns `exp`.
pub type Claims = Map<String, Value>;

/// Parse a signing algorithm name, accepting only the HMAC family
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    let algorithm: Algorithm = name
        .parse()
        .map_err(|_| AuthError::InvalidAlgorithm(name.to_string()))?;
    ensure_symmetric(algorithm)?;
    Ok(algorithm)
}

fn ensure_symmetric(algorithm: Algorithm) -> Result<(), AuthError> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(()),
        other => Err(AuthError::InvalidAlgorithm(format!("{:?}", other))),
    }
}

/// Signs and verifies time-bounded tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec
    pub fn new(secret: &str, algorithm: Algorithm) -> Result<Self, AuthError> {
        ensure_symmetric(algorithm)?;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        })
    }

    /// Override the lifetime applied when `encode` gets no explicit delta
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sign a copy of `claims` with an `exp` of now plus `expires_delta`
    /// (or the default TTL). An `exp` already present in `claims` is replaced.
    pub fn encode(&self, claims: &Claims, expires_delta: Option<Duration>) -> Result<String, AuthError> {
        let expire = Utc::now() + expires_delta.unwrap_or(self.default_ttl);

        let mut to_encode = claims.clone();
        to_encode.insert("exp".to_string(), json!(expire.timestamp()));

        encode(&Header::new(self.algorithm), &to_encode, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Verify signature and expiry and return the claims
    ///
    /// Malformed, tampered, foreign-key and expired tokens all fail the same
    /// way with `AuthError::InvalidToken`.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key", Algorithm::HS256).unwrap()
    }

    fn subject(name: &str) -> Claims {
        let mut claims = Claims::new();
        claims.insert("sub".to_string(), json!(name));
        claims
    }

    #[test]
    fn test_encode_decode_adds_only_expiry() {
        let codec = codec();
        let mut claims = subject("alice");
        claims.insert("scope".to_string(), json!(["read", "write"]));

        let token = codec.encode(&claims, None).unwrap();
        let mut decoded = codec.decode(&token).unwrap();

        assert!(decoded.remove("exp").unwrap().is_i64());
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_default_ttl_is_fifteen_minutes() {
        let codec = codec();
        let before = Utc::now().timestamp();

        let token = codec.encode(&subject("alice"), None).unwrap();
        let exp = codec.decode(&token).unwrap()["exp"].as_i64().unwrap();

        let ttl = exp - before;
        assert!((15 * 60..=15 * 60 + 5).contains(&ttl), "ttl was {}", ttl);
    }

    #[test]
    fn test_explicit_ttl() {
        let codec = codec();
        let before = Utc::now().timestamp();

        let token = codec.encode(&subject("alice"), Some(Duration::minutes(30))).unwrap();
        let exp = codec.decode(&token).unwrap()["exp"].as_i64().unwrap();

        let ttl = exp - before;
        assert!((30 * 60..=30 * 60 + 5).contains(&ttl), "ttl was {}", ttl);
    }

    #[test]
    fn test_configured_default_ttl() {
        let codec = codec().with_default_ttl(Duration::minutes(5));
        let before = Utc::now().timestamp();

        let token = codec.encode(&subject("alice"), None).unwrap();
        let exp = codec.decode(&token).unwrap()["exp"].as_i64().unwrap();

        assert!((5 * 60..=5 * 60 + 5).contains(&(exp - before)));
    }

    #[test]
    fn test_existing_exp_is_replaced() {
        let codec = codec();
        let mut claims = subject("alice");
        claims.insert("exp".to_string(), json!(1));

        let token = codec.encode(&claims, None).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert!(decoded["exp"].as_i64().unwrap() > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec();

        let token = codec.encode(&subject("alice"), Some(Duration::seconds(-30))).unwrap();
        assert!(matches!(codec.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = codec().encode(&subject("alice"), None).unwrap();
        let other = TokenCodec::new("another-secret", Algorithm::HS256).unwrap();

        assert!(matches!(other.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_and_expired_rejected() {
        let token = codec()
            .encode(&subject("alice"), Some(Duration::seconds(-30)))
            .unwrap();
        let other = TokenCodec::new("another-secret", Algorithm::HS256).unwrap();

        assert!(matches!(other.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = codec();
        let token = codec.encode(&subject("alice"), None).unwrap();

        let forged = codec.encode(&subject("mallory"), None).unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        assert!(matches!(codec.decode(&tampered), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = codec();

        assert!(matches!(codec.decode("invalid-token"), Err(AuthError::InvalidToken)));
        assert!(matches!(codec.decode(""), Err(AuthError::InvalidToken)));
        assert!(matches!(codec.decode("a.b.c"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let hs512 = TokenCodec::new("test-secret-key", Algorithm::HS512).unwrap();
        let token = hs512.encode(&subject("alice"), None).unwrap();

        assert!(matches!(codec().decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        assert!(matches!(
            TokenCodec::new("secret", Algorithm::RS256),
            Err(AuthError::InvalidAlgorithm(_))
        ));
        assert!(parse_algorithm("ES256").is_err());
        assert!(parse_algorithm("none").is_err());
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
    }
}
