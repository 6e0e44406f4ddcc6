//! # Hardware Address
//!
//! 6-byte Bluetooth device address (BDA) and its `XX:XX:XX:XX:XX:XX` text form.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address size in bytes
pub const ADDRESS_SIZE: usize = 6;

/// Length of the text form (`01:23:45:67:89:AB`)
pub const ADDRESS_TEXT_LEN: usize = ADDRESS_SIZE * 3 - 1;

/// User-facing message shared by every address format error
pub const ADDRESS_FORMAT_MESSAGE: &str =
    "Incorrect BDA format. Expected: \"01:23:45:67:89:AB\" (String hex format)";

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Address text parsing errors
///
/// All variants render the same user-facing message; the variant and its
/// payload say what was actually wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressFormatError {
    /// Text is not exactly 17 bytes long
    #[error("{}", ADDRESS_FORMAT_MESSAGE)]
    WrongLength(usize),

    /// Non-hex character at the given byte offset
    #[error("{}", ADDRESS_FORMAT_MESSAGE)]
    InvalidHexDigit { position: usize },

    /// Byte group separator other than `:` at the given byte offset
    #[error("{}", ADDRESS_FORMAT_MESSAGE)]
    InvalidSeparator { position: usize },
}

/// Bluetooth device address
///
/// Used as the correlation key between snapshots. Not unique across time: an
/// entity that disappears and a new one reusing the address are the same key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub const fn octets(&self) -> [u8; ADDRESS_SIZE] {
        self.0
    }

    /// Raw address bytes as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            let hi = HEX_DIGITS[(byte >> 4) as usize] as char;
            let lo = HEX_DIGITS[(byte & 0x0F) as usize] as char;
            write!(f, "{}{}", hi, lo)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressFormatError;

    /// Parse `01:23:45:67:89:AB` (either hex case)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.as_bytes();
        if text.len() != ADDRESS_TEXT_LEN {
            return Err(AddressFormatError::WrongLength(text.len()));
        }

        let mut bytes = [0u8; ADDRESS_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pos = i * 3;
            let hi = hex_nibble(text[pos])
                .ok_or(AddressFormatError::InvalidHexDigit { position: pos })?;
            let lo = hex_nibble(text[pos + 1])
                .ok_or(AddressFormatError::InvalidHexDigit { position: pos + 1 })?;
            *byte = (hi << 4) | lo;

            if i + 1 < ADDRESS_SIZE && text[pos + 2] != b':' {
                return Err(AddressFormatError::InvalidSeparator { position: pos + 2 });
            }
        }

        Ok(Self(bytes))
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse()
            .map_err(|e| D::Error::custom(format!("{} (got {:?})", e, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let addr: Address = "01:23:45:67:89:AB".parse().unwrap();
        assert_eq!(addr.octets(), [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);
    }

    #[test]
    fn test_parse_lowercase_address() {
        let addr: Address = "de:ad:be:ef:00:0f".parse().unwrap();
        assert_eq!(addr.octets(), [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x0F]);
    }

    #[test]
    fn test_parse_wrong_length() {
        let result = "01:23:45:67:89".parse::<Address>();
        assert_eq!(result, Err(AddressFormatError::WrongLength(14)));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!("".parse::<Address>(), Err(AddressFormatError::WrongLength(0)));
    }

    #[test]
    fn test_parse_invalid_hex_digit() {
        let result = "GZ:23:45:67:89:AB".parse::<Address>();
        assert_eq!(result, Err(AddressFormatError::InvalidHexDigit { position: 0 }));

        let result = "01:23:45:67:89:AX".parse::<Address>();
        assert_eq!(result, Err(AddressFormatError::InvalidHexDigit { position: 16 }));
    }

    #[test]
    fn test_parse_invalid_separator() {
        let result = "01-23-45-67-89-AB".parse::<Address>();
        assert_eq!(result, Err(AddressFormatError::InvalidSeparator { position: 2 }));
    }

    #[test]
    fn test_parse_multibyte_text_does_not_panic() {
        // 17 bytes, but 'é' spans two of them
        let result = "01:23:45:67:89:é".parse::<Address>();
        assert!(matches!(result, Err(AddressFormatError::InvalidHexDigit { .. })));
    }

    #[test]
    fn test_error_message_is_fixed() {
        let errors = [
            AddressFormatError::WrongLength(1),
            AddressFormatError::InvalidHexDigit { position: 4 },
            AddressFormatError::InvalidSeparator { position: 5 },
        ];
        for err in errors {
            assert_eq!(err.to_string(), ADDRESS_FORMAT_MESSAGE);
        }
    }

    #[test]
    fn test_display_uppercase() {
        let addr = Address::new([0x0a, 0xbc, 0x00, 0xff, 0x12, 0x9e]);
        assert_eq!(addr.to_string(), "0A:BC:00:FF:12:9E");
        assert_eq!(format!("{:?}", addr), "Address(0A:BC:00:FF:12:9E)");
    }

    #[test]
    fn test_text_form_parses_back() {
        let addr = Address::new([0xC0, 0xFF, 0xEE, 0x01, 0x02, 0x03]);
        assert_eq!(addr.to_string().parse::<Address>(), Ok(addr));
    }

    #[test]
    fn test_serde_uses_text_form() {
        let addr = Address::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"01:23:45:67:89:AB\"");

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);

        assert!(serde_json::from_str::<Address>("\"nope\"").is_err());
    }
}
