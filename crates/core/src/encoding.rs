//! Wire encodings
//!
//! Byte fields travel as standard base64 strings. The signed message is the
//! decimal ASCII form of the input, so `17` is signed as `b"17"` and sent as
//! `"MTc="`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::InputValue;

/// Byte buffer carried as base64 on the wire
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Wrap raw bytes
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a standard base64 string
    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(encoded).map(Self)
    }

    /// Encode as standard base64
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Raw bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of raw bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the raw bytes
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binary({})", self.to_base64())
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Binary {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Serialize for Binary {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(d)?;
        Self::from_base64(&encoded).map_err(|e| D::Error::custom(format!("invalid base64: {e}")))
    }
}

/// Canonical message bytes for an input
pub fn encode_decimal(value: InputValue) -> Vec<u8> {
    value.to_string().into_bytes()
}

/// Parse message bytes as a decimal integer
///
/// Returns `None` when the bytes are not UTF-8 or not an integer. Accepts
/// non-canonical spellings such as `"017"`; callers needing exact bytes
/// compare against [`encode_decimal`]. An integer outside the
/// [`InputValue`] range, e.g. `"9223372036854775808"`, is also `None`,
/// so it surfaces as undecodable rather than as a mismatch.
pub fn decode_decimal(bytes: &[u8]) -> Option<InputValue> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_encoding() {
        assert_eq!(encode_decimal(17), b"17");
        assert_eq!(Binary::new(encode_decimal(17)).to_base64(), "MTc=");
        assert_eq!(Binary::new(encode_decimal(3)).to_base64(), "Mw==");
        assert_eq!(encode_decimal(-42), b"-42");
    }

    #[test]
    fn test_decode_decimal() {
        assert_eq!(decode_decimal(b"17"), Some(17));
        assert_eq!(decode_decimal(b"-3"), Some(-3));
        assert_eq!(decode_decimal(b"017"), Some(17));
        assert_eq!(decode_decimal(b"17 "), None);
        assert_eq!(decode_decimal(b"seventeen"), None);
        assert_eq!(decode_decimal(&[0xff, 0xfe]), None);
        assert_eq!(decode_decimal(b"99999999999999999999"), None);
        assert_eq!(decode_decimal(b"9223372036854775807"), Some(i64::MAX));
        assert_eq!(decode_decimal(b"9223372036854775808"), None);
        assert_eq!(decode_decimal(b"-9223372036854775809"), None);
    }

    #[test]
    fn test_binary_json() {
        let bin: Binary = serde_json::from_str("\"MTc=\"").unwrap();
        assert_eq!(bin.as_slice(), b"17");
        assert_eq!(serde_json::to_string(&bin).unwrap(), "\"MTc=\"");
    }

    #[test]
    fn test_binary_rejects_bad_base64() {
        let err = serde_json::from_str::<Binary>("\"not base64!\"").unwrap_err();
        assert!(err.to_string().contains("invalid base64"));
    }
}
