//! Single-use, time-limited password reset tokens.
//!
//! A token is `<issued-at in base36>-<hex HMAC-SHA256>`. The MAC covers the
//! user id, the user's current password hash and last login, so resetting
//! the password (or logging in) invalidates every token issued before it.
//! Nothing is stored server-side.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::ResetTokenError;

type HmacSha256 = Hmac<Sha256>;

const KEY_SALT: &str = "platter.password-reset";

/// Default validity window: three days.
pub const DEFAULT_TIMEOUT_SECS: i64 = 3 * 24 * 60 * 60;

/// The user state a token is bound to.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub password_hash: &'a str,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ResetTokenGenerator {
    secret: Vec<u8>,
    timeout_secs: i64,
}

impl ResetTokenGenerator {
    pub fn new(secret: impl AsRef<[u8]>, timeout_secs: i64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            timeout_secs,
        }
    }

    pub fn make_token(&self, subject: TokenSubject<'_>, now: DateTime<Utc>) -> String {
        let issued_at = now.timestamp().max(0) as u64;
        let mac = self.mac_for(subject, issued_at);
        format!(
            "{}-{}",
            to_base36(issued_at),
            hex::encode(mac.finalize().into_bytes())
        )
    }

    pub fn check_token(
        &self,
        subject: TokenSubject<'_>,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ResetTokenError> {
        let (ts_part, sig_part) = token.split_once('-').ok_or(ResetTokenError::Malformed)?;
        let issued_at = from_base36(ts_part).ok_or(ResetTokenError::Malformed)?;
        let signature = hex::decode(sig_part).map_err(|_| ResetTokenError::Malformed)?;

        self.mac_for(subject, issued_at)
            .verify_slice(&signature)
            .map_err(|_| ResetTokenError::BadSignature)?;

        let age = now.timestamp() - issued_at as i64;
        if age > self.timeout_secs {
            return Err(ResetTokenError::Expired);
        }

        Ok(())
    }

    fn mac_for(&self, subject: TokenSubject<'_>, issued_at: u64) -> HmacSha256 {
        // HMAC accepts keys of any length
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC key of any size");
        let last_login = subject
            .last_login
            .map(|t| t.timestamp().to_string())
            .unwrap_or_default();
        let payload = format!(
            "{KEY_SALT}\n{}\n{}\n{last_login}\n{issued_at}",
            subject.user_id, subject.password_hash
        );
        mac.update(payload.as_bytes());
        mac
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<u64> {
    // 13 base36 digits already overflow u64
    if s.is_empty() || s.len() > 12 {
        return None;
    }
    u64::from_str_radix(s, 36).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn subject(hash: &str) -> TokenSubject<'_> {
        TokenSubject {
            user_id: Uuid::from_u128(0x1234),
            password_hash: hash,
            last_login: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_base36_round_trip() {
        for n in [0u64, 1, 35, 36, 1_741_944_413, u32::MAX as u64] {
            assert_eq!(from_base36(&to_base36(n)), Some(n));
        }
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_fresh_token_checks() {
        let gen = ResetTokenGenerator::new("secret", DEFAULT_TIMEOUT_SECS);
        let token = gen.make_token(subject("hash-a"), now());
        assert_eq!(gen.check_token(subject("hash-a"), &token, now()), Ok(()));
    }

    #[test]
    fn test_token_dies_with_password_change() {
        let gen = ResetTokenGenerator::new("secret", DEFAULT_TIMEOUT_SECS);
        let token = gen.make_token(subject("hash-a"), now());
        assert_eq!(
            gen.check_token(subject("hash-b"), &token, now()),
            Err(ResetTokenError::BadSignature)
        );
    }

    #[test]
    fn test_token_dies_after_login() {
        let gen = ResetTokenGenerator::new("secret", DEFAULT_TIMEOUT_SECS);
        let token = gen.make_token(subject("hash-a"), now());
        let logged_in = TokenSubject {
            last_login: Some(now()),
            ..subject("hash-a")
        };
        assert_eq!(
            gen.check_token(logged_in, &token, now()),
            Err(ResetTokenError::BadSignature)
        );
    }

    #[test]
    fn test_expired_token() {
        let gen = ResetTokenGenerator::new("secret", 60);
        let token = gen.make_token(subject("hash-a"), now());
        let later = now() + Duration::seconds(61);
        assert_eq!(
            gen.check_token(subject("hash-a"), &token, later),
            Err(ResetTokenError::Expired)
        );
        let edge = now() + Duration::seconds(60);
        assert_eq!(gen.check_token(subject("hash-a"), &token, edge), Ok(()));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = ResetTokenGenerator::new("secret", 60).make_token(subject("h"), now());
        let other = ResetTokenGenerator::new("another", 60);
        assert_eq!(
            other.check_token(subject("h"), &token, now()),
            Err(ResetTokenError::BadSignature)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let gen = ResetTokenGenerator::new("secret", 60);
        for bad in ["", "nodash", "-abcd", "zz-nothex", "!!-00"] {
            assert_eq!(
                gen.check_token(subject("h"), bad, now()),
                Err(ResetTokenError::Malformed),
                "{bad:?}"
            );
        }
    }
}
