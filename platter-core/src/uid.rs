//! `uidb64` encoding used in password reset links.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

use crate::error::UidError;

pub fn encode_uid(user_id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(user_id.to_string())
}

pub fn decode_uid(uidb64: &str) -> Result<Uuid, UidError> {
    // Tolerate padded input from clients that re-encode the link
    let bytes = URL_SAFE_NO_PAD
        .decode(uidb64.trim().trim_end_matches('='))
        .map_err(|_| UidError::InvalidEncoding)?;
    let text = String::from_utf8(bytes).map_err(|_| UidError::InvalidEncoding)?;
    Uuid::parse_str(&text).map_err(|_| UidError::InvalidId(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let id = Uuid::new_v4();
        assert_eq!(decode_uid(&encode_uid(id)), Ok(id));
    }

    #[test]
    fn test_padded_input_accepted() {
        let id = Uuid::from_u128(7);
        let padded = base64::engine::general_purpose::URL_SAFE.encode(id.to_string());
        assert_eq!(decode_uid(&padded), Ok(id));
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(decode_uid("***"), Err(UidError::InvalidEncoding));
        let not_uuid = URL_SAFE_NO_PAD.encode("42");
        assert_eq!(decode_uid(&not_uuid), Err(UidError::InvalidId("42".into())));
    }
}
