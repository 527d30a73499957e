// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuance and verification.
//!
//! Tokens are self-contained JWTs (`header.payload.signature`) carrying
//! `sub`, `iat` and `exp`. There is no server-side revocation: validity is a
//! function of the signature, the expiry and the subject alone.

use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;
use super::AuthError;
use crate::config::{validate_secret, ConfigurationError, JwtConfig};

/// Issues and verifies bearer tokens under a single shared secret.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    /// Build the service, failing fast on a missing or weak secret.
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, ConfigurationError> {
        validate_secret(secret)?;

        let ttl = chrono::Duration::from_std(ttl)
            .ok()
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .ok_or_else(|| ConfigurationError::InvalidExpiration(format!("{ttl:?}")))?;

        // Expiry is checked by `check_at` with a strict comparison and
        // millisecond precision, so the library's own check stays off.
        // `exp` presence is enforced by `TokenClaims` deserialization.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Build the service from loaded configuration.
    pub fn from_config(config: &JwtConfig) -> Result<Self, ConfigurationError> {
        Self::new(config.secret.as_bytes(), config.expiration)
    }

    /// Token lifetime.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Issue a token for `subject`, valid from now for the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        if subject.trim().is_empty() {
            return Err(AuthError::InvalidSubject);
        }

        // Claims carry millisecond precision.
        let now = now.trunc_subsecs(3);
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))
    }

    /// Parse and signature-check a token, returning all claims.
    ///
    /// Expiry is not considered here.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Parse and signature-check a token, returning its subject.
    pub fn extract_subject(&self, token: &str) -> Result<String, AuthError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Full check against `expected_subject` at instant `now`, reporting why a
    /// token was refused.
    pub fn check_at(
        &self,
        token: &str,
        expected_subject: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, AuthError> {
        let claims = self.decode(token)?;
        if claims.sub != expected_subject {
            return Err(AuthError::SubjectMismatch);
        }
        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    /// True only if the token is authentic, names `expected_subject`, and has
    /// not expired. Never fails.
    pub fn verify(&self, token: &str, expected_subject: &str) -> bool {
        self.verify_at(token, expected_subject, Utc::now())
    }

    /// [`verify`](Self::verify) evaluated at instant `now`.
    pub fn verify_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        self.check_at(token, expected_subject, now).is_ok()
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-0123";
    const ALICE: &str = "alice@example.com";

    fn service(ttl: Duration) -> TokenService {
        TokenService::new(SECRET, ttl).expect("valid secret")
    }

    fn day_service() -> TokenService {
        service(Duration::from_millis(86_400_000))
    }

    #[test]
    fn extract_subject_round_trips() {
        let svc = day_service();
        for subject in [ALICE, "bob@school.example.org", "ünïcødé@example.com"] {
            let token = svc.issue(subject).unwrap();
            assert_eq!(svc.extract_subject(&token).unwrap(), subject);
        }
    }

    #[test]
    fn token_has_three_segments_and_standard_claims() {
        let svc = day_service();
        let token = svc.issue(ALICE).unwrap();
        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
        assert_eq!(header["alg"], "HS256");

        let payload: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
        assert_eq!(payload["sub"], ALICE);
        assert!(payload["iat"].is_number());
        assert!(payload["exp"].is_number());
    }

    #[test]
    fn default_ttl_is_applied_to_expiry() {
        let svc = day_service();
        let now = Utc::now();
        let token = svc.issue_at(ALICE, now).unwrap();
        let claims = svc.decode(&token).unwrap();
        assert_eq!((claims.exp - claims.iat).num_milliseconds(), 86_400_000);
    }

    #[test]
    fn verify_is_true_right_after_issuance() {
        let svc = day_service();
        let token = svc.issue(ALICE).unwrap();
        assert!(svc.verify(&token, ALICE));
    }

    #[test]
    fn verify_rejects_other_subject() {
        let svc = day_service();
        let token = svc.issue(ALICE).unwrap();
        assert!(!svc.verify(&token, "mallory@example.com"));
        assert!(matches!(
            svc.check_at(&token, "mallory@example.com", Utc::now()),
            Err(AuthError::SubjectMismatch)
        ));
    }

    #[test]
    fn expiry_boundary_uses_strict_comparison() {
        let svc = service(Duration::from_millis(1000));
        let issued = Utc::now().trunc_subsecs(3);
        let token = svc.issue_at(ALICE, issued).unwrap();
        let exp = issued + chrono::Duration::milliseconds(1000);

        assert!(svc.verify_at(&token, ALICE, exp - chrono::Duration::milliseconds(1)));
        assert!(svc.verify_at(&token, ALICE, exp));
        assert!(!svc.verify_at(&token, ALICE, exp + chrono::Duration::milliseconds(1)));
        assert!(matches!(
            svc.check_at(&token, ALICE, exp + chrono::Duration::milliseconds(1)),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn short_lived_token_expires_after_sleep() {
        let svc = service(Duration::from_millis(1000));
        let token = svc.issue(ALICE).unwrap();
        assert!(svc.verify(&token, ALICE));

        std::thread::sleep(Duration::from_millis(1100));
        assert!(!svc.verify(&token, ALICE));
        // Still authentic, only stale.
        assert_eq!(svc.extract_subject(&token).unwrap(), ALICE);
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let svc = day_service();
        let token = svc.issue(ALICE).unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;
        let sig_len = token.len() - sig_start;

        for offset in [0, sig_len / 2, sig_len - 2] {
            let mut bytes = token.clone().into_bytes();
            let idx = sig_start + offset;
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            assert!(matches!(
                svc.extract_subject(&tampered),
                Err(AuthError::InvalidToken(_))
            ));
            assert!(!svc.verify(&tampered, ALICE));
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let svc = day_service();
        let token = svc.issue(ALICE).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload =
            URL_SAFE_NO_PAD.encode(br#"{"sub":"mallory@example.com","iat":0,"exp":99999999999}"#);
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(svc.extract_subject(&forged).is_err());
        assert!(!svc.verify(&forged, "mallory@example.com"));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = TokenService::new(
            b"another-secret-that-is-long-enough!!",
            Duration::from_secs(60),
        )
        .unwrap();
        let token = other.issue(ALICE).unwrap();
        assert!(day_service().extract_subject(&token).is_err());
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(br#"{"sub":"alice@example.com","iat":0,"exp":99999999999}"#);
        let token = format!("{header}.{payload}.");
        assert!(day_service().extract_subject(&token).is_err());
    }

    #[test]
    fn garbage_is_invalid_not_a_panic() {
        let svc = day_service();
        for garbage in ["", "garbage", "a.b.c", "....", "Bearer x"] {
            assert!(matches!(
                svc.extract_subject(garbage),
                Err(AuthError::InvalidToken(_))
            ));
            assert!(!svc.verify(garbage, ALICE));
        }
    }

    #[test]
    fn empty_subject_cannot_be_issued() {
        assert!(matches!(
            day_service().issue("  "),
            Err(AuthError::InvalidSubject)
        ));
    }

    #[test]
    fn ten_character_secret_is_a_configuration_error() {
        let err = TokenService::new(b"0123456789", Duration::from_secs(60)).unwrap_err();
        assert_eq!(err, ConfigurationError::SecretTooShort { actual: 10 });
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let err = TokenService::new(b"", Duration::from_secs(60)).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingSecret);
    }

    #[test]
    fn zero_ttl_is_a_configuration_error() {
        let err = TokenService::new(SECRET, Duration::ZERO).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidExpiration(_)));
    }
}
