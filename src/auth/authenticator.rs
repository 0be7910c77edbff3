//! Bearer token authentication.
//!
//! # Responsibilities
//! - Split and validate the `Authorization` header
//! - Verify the token signature against the configured key/algorithm
//! - Enforce expiration, not-before, issuer and audience constraints
//!
//! # Design Decisions
//! - Signature verification is delegated to `jsonwebtoken` with its
//!   own claim validation disabled; the temporal and issuer/audience
//!   checks run here so every failure maps to one exact error variant
//! - Clock skew widens the acceptance window symmetrically
//! - The full decoded claim set is returned, registered claims
//!   included, so authorization can target any claim name

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::auth::claims::{claims_from_json, ClaimValue, Claims};
use crate::config::schema::AuthenticationConfig;
use crate::errors::AuthError;

/// Trait for validating a bearer token and extracting its claims.
/// Object-safe so the decision engine can take a test double.
pub trait Authenticator: Send + Sync {
    /// Validate the raw `Authorization` header value and return the
    /// decoded claim set.
    fn authenticate(&self, authorization_header: &str) -> Result<Claims, AuthError>;
}

/// JWT-based [`Authenticator`] implementation.
///
/// Key and algorithm are supplied once at construction; the value is
/// immutable afterwards and shared read-only across request tasks.
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
    config: AuthenticationConfig,
}

impl JwtAuthenticator {
    pub fn new(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        config: AuthenticationConfig,
    ) -> Self {
        // Signature-only validation; every other constraint is
        // checked in authenticate() with its own failure code.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            decoding_key,
            validation,
            config,
        }
    }

    fn check_temporal(&self, claims: &Claims, now: f64) -> Result<(), AuthError> {
        let skew = self.config.clock_skew_in_seconds as f64;

        match numeric_claim(claims.get("exp")) {
            Some(exp) if now > exp + skew => return Err(AuthError::Expired),
            Some(_) => {}
            None if !self.config.ignore_expiration => return Err(AuthError::MissingExpiration),
            None => {}
        }

        match numeric_claim(claims.get("nbf")) {
            Some(nbf) if now < nbf - skew => return Err(AuthError::NotYetValid),
            Some(_) => {}
            None if !self.config.ignore_not_before => return Err(AuthError::MissingNotBefore),
            None => {}
        }

        Ok(())
    }

    fn check_issuer(&self, claims: &Claims) -> Result<(), AuthError> {
        let Some(issuer) = configured(&self.config.issuer) else {
            return Ok(());
        };

        match claims.get("iss") {
            Some(ClaimValue::String(iss)) if iss == issuer => Ok(()),
            _ => Err(AuthError::InvalidIssuer),
        }
    }

    fn check_audience(&self, claims: &Claims) -> Result<(), AuthError> {
        let Some(audience) = configured(&self.config.audience) else {
            return Ok(());
        };

        // aud may be a single string or an array of strings
        let contained = match claims.get("aud") {
            Some(ClaimValue::String(aud)) => aud == audience,
            Some(ClaimValue::Sequence(items)) => items
                .iter()
                .any(|v| matches!(v, ClaimValue::String(s) if s == audience)),
            _ => false,
        };

        if contained {
            Ok(())
        } else {
            Err(AuthError::InvalidAudience)
        }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, authorization_header: &str) -> Result<Claims, AuthError> {
        let parts: Vec<&str> = authorization_header.split(' ').collect();
        let &[scheme, payload] = parts.as_slice() else {
            return Err(AuthError::MalformedHeader(
                "expected exactly two space-separated tokens".to_string(),
            ));
        };

        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::MalformedHeader(format!(
                "unexpected authentication scheme {scheme:?}"
            )));
        }

        let token = decode::<serde_json::Value>(payload, &self.decoding_key, &self.validation)?;
        let claims = claims_from_json(token.claims);

        let now = jsonwebtoken::get_current_timestamp() as f64;
        self.check_temporal(&claims, now)?;
        self.check_issuer(&claims)?;
        self.check_audience(&claims)?;

        Ok(claims)
    }
}

/// Treat an absent or empty setting as "not configured".
fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn numeric_claim(value: Option<&ClaimValue>) -> Option<f64> {
    match value {
        Some(ClaimValue::Number(n)) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"unit-test-secret";

    fn mint(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn bearer(claims: &serde_json::Value) -> String {
        format!("Bearer {}", mint(claims))
    }

    fn authenticator(config: AuthenticationConfig) -> JwtAuthenticator {
        JwtAuthenticator::new(DecodingKey::from_secret(SECRET), Algorithm::HS256, config)
    }

    fn fresh_claims() -> serde_json::Value {
        let now = get_current_timestamp();
        json!({ "exp": now + 300, "nbf": now - 300 })
    }

    #[test]
    fn test_header_must_have_two_tokens() {
        let auth = authenticator(AuthenticationConfig::default());

        for header in ["", "Bearer", "Bearer a b", "token"] {
            assert!(matches!(
                auth.authenticate(header),
                Err(AuthError::MalformedHeader(_)),
            ));
        }
    }

    #[test]
    fn test_scheme_must_be_bearer() {
        let auth = authenticator(AuthenticationConfig::default());

        assert!(matches!(
            auth.authenticate("Basic dXNlcjpwYXNz"),
            Err(AuthError::MalformedHeader(_)),
        ));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let auth = authenticator(AuthenticationConfig::default());
        let token = mint(&fresh_claims());

        for scheme in ["bearer", "Bearer", "BEARER"] {
            assert!(auth.authenticate(&format!("{scheme} {token}")).is_ok());
        }
    }

    #[test]
    fn test_wrong_key_rejected() {
        let auth = authenticator(AuthenticationConfig::default());
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &fresh_claims(),
            &EncodingKey::from_secret(b"other-secret"),
        )
        .unwrap();

        assert!(matches!(
            auth.authenticate(&format!("Bearer {forged}")),
            Err(AuthError::InvalidSignature(_)),
        ));
    }

    #[test]
    fn test_garbage_payload_rejected() {
        let auth = authenticator(AuthenticationConfig::default());

        assert!(matches!(
            auth.authenticate("Bearer not.a.token"),
            Err(AuthError::InvalidSignature(_)),
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = authenticator(AuthenticationConfig::default());
        let now = get_current_timestamp();
        let header = bearer(&json!({ "exp": now - 60, "nbf": now - 600 }));

        assert!(matches!(
            auth.authenticate(&header),
            Err(AuthError::Expired),
        ));
    }

    #[test]
    fn test_clock_skew_tolerates_recent_expiry() {
        let auth = authenticator(AuthenticationConfig {
            clock_skew_in_seconds: 120,
            ..Default::default()
        });
        let now = get_current_timestamp();
        let header = bearer(&json!({ "exp": now - 60, "nbf": now - 600 }));

        assert!(auth.authenticate(&header).is_ok());
    }

    #[test]
    fn test_future_not_before_rejected() {
        let auth = authenticator(AuthenticationConfig::default());
        let now = get_current_timestamp();
        let header = bearer(&json!({ "exp": now + 600, "nbf": now + 60 }));

        assert!(matches!(
            auth.authenticate(&header),
            Err(AuthError::NotYetValid),
        ));
    }

    #[test]
    fn test_clock_skew_tolerates_near_not_before() {
        let auth = authenticator(AuthenticationConfig {
            clock_skew_in_seconds: 120,
            ..Default::default()
        });
        let now = get_current_timestamp();
        let header = bearer(&json!({ "exp": now + 600, "nbf": now + 60 }));

        assert!(auth.authenticate(&header).is_ok());
    }

    #[test]
    fn test_missing_expiration_rejected_by_default() {
        let auth = authenticator(AuthenticationConfig::default());
        let now = get_current_timestamp();
        let header = bearer(&json!({ "nbf": now - 60 }));

        assert!(matches!(
            auth.authenticate(&header),
            Err(AuthError::MissingExpiration),
        ));
    }

    #[test]
    fn test_missing_expiration_accepted_when_ignored() {
        let auth = authenticator(AuthenticationConfig {
            ignore_expiration: true,
            ..Default::default()
        });
        let now = get_current_timestamp();
        let header = bearer(&json!({ "nbf": now - 60 }));

        assert!(auth.authenticate(&header).is_ok());
    }

    #[test]
    fn test_missing_not_before_rejected_by_default() {
        let auth = authenticator(AuthenticationConfig::default());
        let now = get_current_timestamp();
        let header = bearer(&json!({ "exp": now + 600 }));

        assert!(matches!(
            auth.authenticate(&header),
            Err(AuthError::MissingNotBefore),
        ));
    }

    #[test]
    fn test_missing_not_before_accepted_when_ignored() {
        let auth = authenticator(AuthenticationConfig {
            ignore_not_before: true,
            ..Default::default()
        });
        let now = get_current_timestamp();
        let header = bearer(&json!({ "exp": now + 600 }));

        assert!(auth.authenticate(&header).is_ok());
    }

    #[test]
    fn test_issuer_mismatch_rejected() {
        let auth = authenticator(AuthenticationConfig {
            issuer: Some("https://issuer".to_string()),
            ..Default::default()
        });

        let mut claims = fresh_claims();
        claims["iss"] = json!("https://someone-else");
        assert!(matches!(
            auth.authenticate(&bearer(&claims)),
            Err(AuthError::InvalidIssuer),
        ));
    }

    #[test]
    fn test_missing_issuer_claim_rejected() {
        let auth = authenticator(AuthenticationConfig {
            issuer: Some("https://issuer".to_string()),
            ..Default::default()
        });

        assert!(matches!(
            auth.authenticate(&bearer(&fresh_claims())),
            Err(AuthError::InvalidIssuer),
        ));
    }

    #[test]
    fn test_matching_issuer_accepted() {
        let auth = authenticator(AuthenticationConfig {
            issuer: Some("https://issuer".to_string()),
            ..Default::default()
        });

        let mut claims = fresh_claims();
        claims["iss"] = json!("https://issuer");
        assert!(auth.authenticate(&bearer(&claims)).is_ok());
    }

    #[test]
    fn test_audience_as_scalar_and_array() {
        let auth = authenticator(AuthenticationConfig {
            audience: Some("gateway".to_string()),
            ..Default::default()
        });

        let mut claims = fresh_claims();
        claims["aud"] = json!("gateway");
        assert!(auth.authenticate(&bearer(&claims)).is_ok());

        claims["aud"] = json!(["other", "gateway"]);
        assert!(auth.authenticate(&bearer(&claims)).is_ok());

        claims["aud"] = json!(["other"]);
        assert!(matches!(
            auth.authenticate(&bearer(&claims)),
            Err(AuthError::InvalidAudience),
        ));
    }

    #[test]
    fn test_missing_audience_claim_rejected() {
        let auth = authenticator(AuthenticationConfig {
            audience: Some("gateway".to_string()),
            ..Default::default()
        });

        assert!(matches!(
            auth.authenticate(&bearer(&fresh_claims())),
            Err(AuthError::InvalidAudience),
        ));
    }

    #[test]
    fn test_registered_claims_are_exposed() {
        let auth = authenticator(AuthenticationConfig::default());

        let mut claims = fresh_claims();
        claims["sub"] = json!("user-1");
        claims["permission"] = json!(["Read"]);

        let decoded = auth.authenticate(&bearer(&claims)).unwrap();
        assert!(decoded.contains_key("sub"));
        assert!(decoded.contains_key("exp"));
        assert!(decoded.contains_key("permission"));
    }
}
