// Adapters for the token and password ports: HS256 JWTs and argon2 PHC hashes.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;

use crate::domain::{AuthError, Claims, PasswordHasher, TokenCodec};

#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means expired; no grace period.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[derive(Clone, Default)]
pub struct Argon2Hasher;

// Hashing and verification run on the blocking pool.
#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, plain: &str) -> Result<String, AuthError> {
        let plain = plain.to_owned();
        tokio::task::spawn_blocking(move || hash_password(&plain))
            .await
            .map_err(|err| AuthError::Hashing(err.to_string()))?
    }

    async fn verify(&self, plain: &str, stored_hash: &str) -> bool {
        let (plain, stored_hash) = (plain.to_owned(), stored_hash.to_owned());
        match tokio::task::spawn_blocking(move || verify_password(&plain, &stored_hash)).await {
            Ok(matches) => matches,
            Err(err) => {
                tracing::error!(error = %err, "password verification task failed");
                false
            }
        }
    }
}

fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

fn verify_password(plain: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use chrono::Utc;

    #[test]
    fn when_token_is_issued_then_it_verifies_to_same_claims() {
        let codec = JwtCodec::new(b"test-secret");
        let claims = Claims::admin("admin", Utc::now());

        let token = codec.issue(&claims).expect("expected token");
        let decoded = codec.verify(&token).expect("expected valid token");

        assert_eq!(decoded, claims);
        assert_eq!(decoded.role, Role::Admin);
    }

    #[test]
    fn when_token_has_expired_then_verify_reports_expiry() {
        let codec = JwtCodec::new(b"test-secret");
        let issued = Utc::now() - chrono::Duration::days(2);
        let claims = Claims::admin("admin", issued);

        let token = codec.issue(&claims).expect("expected token");

        assert!(matches!(codec.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn when_token_is_signed_with_another_secret_then_it_is_invalid() {
        let token = JwtCodec::new(b"other-secret")
            .issue(&Claims::admin("admin", Utc::now()))
            .expect("expected token");

        let result = JwtCodec::new(b"test-secret").verify(&token);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn when_token_is_garbage_then_it_is_invalid() {
        let result = JwtCodec::new(b"test-secret").verify("not.a.jwt");

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn when_password_is_hashed_then_only_the_same_password_verifies() {
        let hasher = Argon2Hasher;

        let hash = hasher.hash("correct horse").await.expect("expected hash");

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("correct horse", &hash).await);
        assert!(!hasher.verify("wrong horse", &hash).await);
        assert!(!hasher.verify(" correct horse ", &hash).await);
        assert!(!hasher.verify("correct horse", "not-a-phc-string").await);
    }
}
