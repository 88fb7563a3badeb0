//! Minimal email address check for signup, signin and feedback.
//!
//! This is a shape check, not deliverability: one `@`, a non-empty local
//! part, and a dotted domain without empty labels.

pub const MAX_EMAIL_LEN: usize = 254;

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

/// Emails are compared case-insensitively; store them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_email("cook@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
    }

    #[test]
    fn test_invalid_addresses() {
        for bad in [
            "",
            "plain",
            "@example.com",
            "cook@",
            "cook@localhost",
            "cook@exa mple.com",
            "a@b@c.com",
            "cook@.example.com",
            "cook@example..com",
            "cook@-example.com",
        ] {
            assert!(!is_valid_email(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_email("  Cook@Example.COM "), "cook@example.com");
    }
}
