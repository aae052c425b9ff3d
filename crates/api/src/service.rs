//! Shared business logic — framework-agnostic pure functions.
//!
//! Route handlers stay thin adapters: input validation, token issuance, and
//! step-answer bookkeeping live here so they can be unit-tested without a
//! server or database.

use arrowhead_core::{journey, JourneyModule, StepAnswers};

use crate::{AuthTokenResponse, ServiceError};

// ─── Validation ─────────────────────────────────────────────────────────────

/// Validate and normalize an email address. Returns the lowercased, trimmed
/// email.
pub fn validate_email(email: &str) -> Result<String, ServiceError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') || email.len() > 254 {
        return Err(ServiceError::BadRequest("invalid email address".into()));
    }
    Ok(email)
}

/// Validate a password (at least 8 characters, at most 128).
pub fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < 8 {
        return Err(ServiceError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }
    if password.len() > 128 {
        return Err(ServiceError::BadRequest(
            "password must be at most 128 characters".into(),
        ));
    }
    Ok(())
}

/// Validate and normalize a user display name. Returns the trimmed name.
pub fn validate_display_name(name: &str) -> Result<String, ServiceError> {
    let trimmed = name.trim().to_string();
    if trimmed.is_empty() || trimmed.len() > 64 {
        return Err(ServiceError::BadRequest(
            "display name must be 1-64 characters".into(),
        ));
    }
    Ok(trimmed)
}

/// Validate and normalize a team, project, or objective name.
pub fn validate_name(kind: &str, name: &str) -> Result<String, ServiceError> {
    let trimmed = name.trim().to_string();
    if trimmed.is_empty() {
        return Err(ServiceError::BadRequest(format!("'{kind}' name is required")));
    }
    if trimmed.len() > 200 {
        return Err(ServiceError::BadRequest(format!(
            "{kind} name must be at most 200 characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a journey step number (1-17).
pub fn validate_step(step: u32) -> Result<u32, ServiceError> {
    if journey::step_info(step).is_none() {
        return Err(ServiceError::BadRequest(format!(
            "step must be between 1 and {}",
            journey::TOTAL_STEPS
        )));
    }
    Ok(step)
}

/// Validate incoming step answers against a module's field table.
pub fn validate_answers(
    module: JourneyModule,
    answers: &StepAnswers,
) -> Result<(), ServiceError> {
    answers
        .validate_fields(module)
        .map_err(|e| ServiceError::BadRequest(format!("unknown step field: {e}")))
}

// ─── Auth Token Resolution ──────────────────────────────────────────────────

/// Verify a bearer token and return the authenticated user id.
///
/// Centralizes the JWT branching so each backend only extracts the token
/// string from headers and calls this.
pub fn resolve_bearer(token: &str, jwt_secret: &str, now: u64) -> Result<String, ServiceError> {
    if jwt_secret.is_empty() {
        return Err(ServiceError::Unauthorized(
            "JWT authentication not configured".into(),
        ));
    }
    crate::crypto::verify_jwt(token, jwt_secret, now)
}

// ─── Token Bundle ───────────────────────────────────────────────────────────

/// Pre-computed token bundle returned by [`prepare_token_bundle`].
///
/// Contains everything needed to insert a refresh token and return the auth
/// response. The caller only performs the DB INSERT.
pub struct TokenBundle {
    /// JWT access token.
    pub access_token: String,
    /// Raw refresh token (sent to the client).
    pub refresh_token: String,
    /// SHA-256 hash of the refresh token (stored in DB).
    pub token_hash: String,
    /// UUID primary key for the refresh_tokens row.
    pub token_id: String,
    /// `datetime` string for the refresh token expiry (DB column value).
    pub expires_at: String,
    /// Ready-to-return API response.
    pub response: AuthTokenResponse,
}

/// Build a [`TokenBundle`] containing a JWT, refresh token, and the auth
/// response.
pub fn prepare_token_bundle(
    jwt_secret: &str,
    user_id: &str,
    display_name: &str,
    now_unix: u64,
) -> Result<TokenBundle, ServiceError> {
    use crate::crypto;

    let access_token = crypto::sign_jwt(user_id, jwt_secret, now_unix);
    let refresh_token = crypto::generate_token()?;
    let token_hash = crypto::hash_token(&refresh_token);
    let token_id = uuid::Uuid::new_v4().to_string();

    let base = chrono::DateTime::from_timestamp(now_unix as i64, 0)
        .ok_or_else(|| ServiceError::Internal("invalid timestamp".into()))?;
    let expires_at = base
        .checked_add_signed(chrono::Duration::seconds(
            crypto::REFRESH_EXPIRY_SECS as i64,
        ))
        .ok_or_else(|| ServiceError::Internal("timestamp overflow".into()))?
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    let response = AuthTokenResponse {
        access_token: access_token.clone(),
        refresh_token: refresh_token.clone(),
        expires_in: crypto::JWT_EXPIRY_SECS,
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
    };

    Ok(TokenBundle {
        access_token,
        refresh_token,
        token_hash,
        token_id,
        expires_at,
        response,
    })
}

/// Current time as `%Y-%m-%d %H:%M:%S`, the format every datetime column
/// uses.
pub fn now_sqlite() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" A@B.co ").unwrap(), "a@b.co");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("alice").is_ok());
        assert_eq!(validate_display_name("  bob  ").unwrap(), "bob");
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name(&"x".repeat(65)).is_err());
        assert!(validate_display_name(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_step() {
        assert!(validate_step(1).is_ok());
        assert!(validate_step(17).is_ok());
        assert!(validate_step(0).is_err());
        assert!(validate_step(18).is_err());
    }

    #[test]
    fn token_bundle_is_consistent() {
        let bundle = prepare_token_bundle("secret", "u1", "Alice", 1_700_000_000).unwrap();
        assert_eq!(bundle.response.user_id, "u1");
        assert_eq!(bundle.response.access_token, bundle.access_token);
        assert_eq!(
            bundle.token_hash,
            crate::crypto::hash_token(&bundle.refresh_token)
        );
        assert_eq!(
            crate::crypto::verify_jwt(&bundle.access_token, "secret", 1_700_000_001).unwrap(),
            "u1"
        );
    }
}
