use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("This password is too short. It must contain at least {0} characters.")]
    TooShort(usize),

    #[error("This password is entirely numeric.")]
    EntirelyNumeric,

    #[error("This password is too common.")]
    TooCommon,

    #[error("The password is too similar to the {0}.")]
    TooSimilar(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResetTokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token has expired")]
    Expired,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UidError {
    #[error("Invalid base64 user id")]
    InvalidEncoding,

    #[error("Invalid user id: {0}")]
    InvalidId(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermNameError {
    #[error("{0} names cannot be empty")]
    Empty(&'static str),

    #[error("{kind} name is too long (max {max} characters)")]
    TooLong { kind: &'static str, max: usize },
}

/// A field-level validation failure in a recipe payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct DraftError {
    pub field: &'static str,
    pub message: String,
}

impl DraftError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
