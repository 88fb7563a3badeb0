//! Password complexity policy applied at signup, password change and reset.
//!
//! Every rule runs, so callers can report all failures at once under the
//! `password` field.

use crate::error::PasswordPolicyError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Lowercased passwords rejected outright.
const COMMON_PASSWORDS: &[&str] = &[
    "123456",
    "12345678",
    "123456789",
    "1234567890",
    "password",
    "password1",
    "password123",
    "passw0rd",
    "qwerty",
    "qwerty123",
    "qwertyuiop",
    "abc123",
    "abcd1234",
    "111111",
    "iloveyou",
    "letmein",
    "welcome",
    "welcome1",
    "monkey",
    "dragon",
    "football",
    "baseball",
    "sunshine",
    "princess",
    "admin123",
    "trustno1",
    "superman",
    "whatever",
    "changeme",
    "1q2w3e4r",
];

/// User attributes that a password must not resemble.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAttributes<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
}

pub fn validate_password(
    password: &str,
    attrs: UserAttributes<'_>,
) -> Result<(), Vec<PasswordPolicyError>> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(PasswordPolicyError::TooShort(MIN_PASSWORD_LENGTH));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push(PasswordPolicyError::EntirelyNumeric);
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.trim()) {
        errors.push(PasswordPolicyError::TooCommon);
    }

    if let Some(username) = attrs.username {
        if too_similar(&lowered, &username.to_lowercase()) {
            errors.push(PasswordPolicyError::TooSimilar("username"));
        }
    }

    if let Some(email) = attrs.email {
        let email = email.to_lowercase();
        let local = email.split('@').next().unwrap_or_default();
        if too_similar(&lowered, &email) || too_similar(&lowered, local) {
            errors.push(PasswordPolicyError::TooSimilar("email address"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Both inputs are already lowercased. Attributes shorter than three
/// characters are ignored since they match too much.
fn too_similar(password: &str, attribute: &str) -> bool {
    let attribute = attribute.trim();
    if attribute.chars().count() < 3 {
        return false;
    }
    password == attribute || password.contains(attribute) || attribute.contains(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs<'a>(username: &'a str, email: &'a str) -> UserAttributes<'a> {
        UserAttributes {
            username: Some(username),
            email: Some(email),
        }
    }

    #[test]
    fn test_accepts_reasonable_password() {
        assert!(validate_password("plum-tart-4-ever", attrs("chef", "chef@example.com")).is_ok());
    }

    #[test]
    fn test_rejects_short() {
        let errors = validate_password("x7#q", UserAttributes::default()).unwrap_err();
        assert_eq!(errors, vec![PasswordPolicyError::TooShort(8)]);
    }

    #[test]
    fn test_rejects_numeric() {
        let errors = validate_password("98127364", UserAttributes::default()).unwrap_err();
        assert_eq!(errors, vec![PasswordPolicyError::EntirelyNumeric]);
    }

    #[test]
    fn test_rejects_common_case_insensitively() {
        let errors = validate_password("PassWord123", UserAttributes::default()).unwrap_err();
        assert_eq!(errors, vec![PasswordPolicyError::TooCommon]);
    }

    #[test]
    fn test_rejects_username_inside_password() {
        let errors =
            validate_password("margaret2024!", attrs("Margaret", "m@example.com")).unwrap_err();
        assert_eq!(errors, vec![PasswordPolicyError::TooSimilar("username")]);
    }

    #[test]
    fn test_rejects_email_local_part() {
        let errors =
            validate_password("gordon.r.cooks", attrs("chef", "gordon.r.cooks@example.com"))
                .unwrap_err();
        assert_eq!(errors, vec![PasswordPolicyError::TooSimilar("email address")]);
    }

    #[test]
    fn test_collects_every_failure() {
        let errors = validate_password("123", UserAttributes::default()).unwrap_err();
        assert!(errors.contains(&PasswordPolicyError::TooShort(8)));
        assert!(errors.contains(&PasswordPolicyError::EntirelyNumeric));
    }

    #[test]
    fn test_short_attributes_ignored() {
        assert!(validate_password("ab-lemon-curd", attrs("ab", "ab@x.io")).is_ok());
    }
}
