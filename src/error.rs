use std::io;

use thiserror::Error;

/// A structural problem found while reading a container or decoding a
/// setting. Offsets inside a setting are relative to the start of its slot.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Header is truncated, {available} of {expected} bytes are available")]
    TruncatedHeader { available: usize, expected: usize },

    #[error("Container is truncated, {available} of {expected} slot bytes are available")]
    TruncatedContainer { available: usize, expected: usize },

    #[error("Byte {value:#04x} in the name at position {offset} is not ASCII")]
    InvalidName { offset: u64, value: u8 },

    #[error("Value {value} is not a valid {field} at position {offset}")]
    InvalidEnum {
        field: &'static str,
        offset: u64,
        value: u8,
    },

    #[error("Value {value:#x} is not a 8-bit boolean for {field} at position {offset}")]
    InvalidBoolean {
        field: &'static str,
        offset: u64,
        value: u8,
    },

    #[error("Code {value} for {field} entry {index} at position {offset} exceeds {max}")]
    InvalidCode {
        field: &'static str,
        index: usize,
        offset: u64,
        value: u16,
        max: u16,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FormatError {
    /// Name of the field that could not be decoded, if the error concerns one.
    pub fn field(&self) -> Option<&'static str> {
        use FormatError::*;
        match self {
            InvalidName { .. } => Some("name"),
            InvalidEnum { field, .. } | InvalidBoolean { field, .. } | InvalidCode { field, .. } => {
                Some(*field)
            }
            TruncatedHeader { .. } | TruncatedContainer { .. } | Io(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::FormatError;

    #[test]
    fn field() {
        let error = FormatError::InvalidEnum {
            field: "clock source",
            offset: 153,
            value: 6,
        };
        assert_eq!(error.field(), Some("clock source"));
        assert_eq!(
            error.to_string(),
            "Value 6 is not a valid clock source at position 153"
        );

        let error = FormatError::TruncatedHeader {
            available: 4,
            expected: 36,
        };
        assert_eq!(error.field(), None);
    }

    #[test]
    fn invalid_code_message() {
        let error = FormatError::InvalidCode {
            field: "transmit map",
            index: 3,
            offset: 165,
            value: 33,
            max: 32,
        };
        assert_eq!(
            error.to_string(),
            "Code 33 for transmit map entry 3 at position 165 exceeds 32"
        );
    }
}
