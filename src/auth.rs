use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use argon2::password_hash::{rand_core::OsRng as PHOsRng, SaltString};

use crate::error::ApiError;
use crate::models::{Role, SessionUser};
use crate::store::Store;

type HmacSha256 = Hmac<Sha256>;

/// Verify password against the Argon2 PHC string stored with the record.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash a new password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut PHOsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| format!("argon2 hash error: {e}"))
}

/* -------------------------
   Session tokens
--------------------------*/

/// Claims embedded in the session token. The role always comes from the
/// credential record that matched at login, never from the request.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    name: String,
    role: Role,
    iat: i64,
    exp: i64,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Signs and verifies session tokens. Tokens are
/// `base64url(claims-json) "." base64url(hmac-sha256 tag)`; verification is
/// purely local, the credential store is never re-hit. Expiry is the only
/// termination event, there is no revocation.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Vec<u8>,
    ttl_days: i64,
}

impl SessionSigner {
    pub fn new(secret: impl Into<Vec<u8>>, ttl_days: i64) -> Self {
        SessionSigner {
            secret: secret.into(),
            ttl_days,
        }
    }

    fn tag(&self, payload: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::Malformed)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    pub fn sign(&self, user: &SessionUser) -> Result<(String, DateTime<Utc>), TokenError> {
        let now = Utc::now();
        let expires_at = now + Duration::days(self.ttl_days);
        self.sign_with_expiry(user, now, expires_at)
    }

    fn sign_with_expiry(
        &self,
        user: &SessionUser,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
        let tag = self.tag(&payload)?;
        Ok((
            format!(
                "{}.{}",
                URL_SAFE_NO_PAD.encode(&payload),
                URL_SAFE_NO_PAD.encode(&tag)
            ),
            expires_at,
        ))
    }

    pub fn verify(&self, token: &str) -> Result<SessionUser, TokenError> {
        let (payload_b64, tag_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::Malformed)?;
        mac.update(&payload);
        mac.verify_slice(&tag)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(SessionUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}

/* -------------------------
   Credential resolution
--------------------------*/

/// Resolve {email, password, role} against the role's credential
/// collection. An email that exists only under the other role is a
/// not-found, not a wrong-password.
pub async fn authenticate(
    store: &dyn Store,
    email: &str,
    password: &str,
    role: &str,
) -> Result<SessionUser, ApiError> {
    let role: Role = role.parse().map_err(ApiError::Validation)?;
    let email = email.trim().to_lowercase();

    let (id, name, stored_email, password_hash) = match role {
        Role::Admin => {
            let admin = store
                .find_admin_by_email(&email)
                .await?
                .ok_or_else(|| not_found(role))?;
            (admin.id, admin.name, admin.email, admin.password_hash)
        }
        Role::Doctor => {
            let doctor = store
                .find_doctor_by_email(&email)
                .await?
                .ok_or_else(|| not_found(role))?;
            (doctor.id, doctor.name, doctor.email, doctor.password_hash)
        }
    };

    if !verify_password(password, &password_hash) {
        return Err(ApiError::invalid_password());
    }

    Ok(SessionUser {
        id,
        email: stored_email,
        name,
        role,
    })
}

fn not_found(role: Role) -> ApiError {
    ApiError::NotFound(format!(
        "{} not found with the provided email.",
        role.display_name()
    ))
}
