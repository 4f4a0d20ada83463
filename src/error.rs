//! Error handling for caller contract violations.
//!
//! Decoding itself never fails: a report that matches nothing simply produces
//! a record with every optional field unset. These errors cover input that is
//! not a report at all (empty, not UTF-8, binary content) and invalid
//! classifier configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Report text is empty")]
    EmptyInput,

    #[error("Report is not valid UTF-8: {source}")]
    InvalidUtf8 {
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Report contains non-text byte 0x{byte:02x} at offset {offset}")]
    NonTextContent { offset: usize, byte: u8 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl DecodeError {
    /// Create a configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(source: std::str::Utf8Error) -> Self {
        Self::InvalidUtf8 { source }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Validate raw report bytes and borrow them as text.
///
/// Rejects empty (or whitespace-only) input, invalid UTF-8, and control
/// characters other than ASCII whitespace.
pub fn validate_report_bytes(bytes: &[u8]) -> Result<&str> {
    if let Some(offset) = bytes
        .iter()
        .position(|b| b.is_ascii_control() && !b.is_ascii_whitespace())
    {
        return Err(DecodeError::NonTextContent {
            offset,
            byte: bytes[offset],
        });
    }

    let text = std::str::from_utf8(bytes)?;
    if text.trim().is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_report_text() {
        let text = validate_report_bytes(b"LFRN 151200Z 28012KT\n").unwrap();
        assert_eq!(text, "LFRN 151200Z 28012KT\n");
    }

    #[test]
    fn test_validate_rejects_empty_and_blank() {
        assert!(matches!(
            validate_report_bytes(b""),
            Err(DecodeError::EmptyInput)
        ));
        assert!(matches!(
            validate_report_bytes(b"  \t "),
            Err(DecodeError::EmptyInput)
        ));
    }

    #[test]
    fn test_validate_rejects_binary_content() {
        let err = validate_report_bytes(b"LFRN\x00151200Z").unwrap_err();
        match err {
            DecodeError::NonTextContent { offset, byte } => {
                assert_eq!(offset, 4);
                assert_eq!(byte, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_invalid_utf8() {
        assert!(matches!(
            validate_report_bytes(&[0x4c, 0xff, 0xfe]),
            Err(DecodeError::InvalidUtf8 { .. })
        ));
    }
}
