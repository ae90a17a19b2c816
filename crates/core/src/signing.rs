//! Client-side signing helpers
//!
//! Wallets own their keys; these helpers exist so tooling and tests can
//! produce submissions the verifier accepts.

use ed25519_dalek::{Signer, SigningKey};
use thiserror::Error;

use crate::encoding::{encode_decimal, Binary};
use crate::msg::SetInput;
use crate::types::InputValue;

/// Seed bytes an Ed25519 key is built from
pub const SEED_LENGTH: usize = ed25519_dalek::SECRET_KEY_LENGTH;

/// Seed padding byte, ASCII `'0'`
pub const SEED_PAD: u8 = b'0';

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("seed is {0} bytes, at most {} allowed", SEED_LENGTH)]
    TooLong(usize),
}

/// Build a signing key from a short seed, right-padded with `'0'`
pub fn signing_key_from_seed(seed: &[u8]) -> Result<SigningKey, SeedError> {
    if seed.len() > SEED_LENGTH {
        return Err(SeedError::TooLong(seed.len()));
    }
    let mut bytes = [SEED_PAD; SEED_LENGTH];
    bytes[..seed.len()].copy_from_slice(seed);
    Ok(SigningKey::from_bytes(&bytes))
}

impl SetInput {
    /// Sign `input` with `key`
    pub fn signed(key: &SigningKey, input: InputValue) -> Self {
        let message = encode_decimal(input);
        let signature = key.sign(&message);
        Self {
            input,
            message: Binary::new(message),
            signature: signature.to_bytes().into(),
            pub_key: key.verifying_key().to_bytes().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::verify;

    #[test]
    fn test_seed_padding_matches_reference_key() {
        let key = signing_key_from_seed(b"seed").unwrap();
        assert_eq!(
            Binary::from(key.verifying_key().to_bytes()).to_base64(),
            "GNBrKE1JwUDF9F1sR268gWbATvlxf5XWMZUS7OanKnw="
        );
        let key = signing_key_from_seed(b"otherseed").unwrap();
        assert_eq!(
            Binary::from(key.verifying_key().to_bytes()).to_base64(),
            "YYXgbomDWBcuN1d8r1aQTyhBpwqOpa32GlRaWiavyZA="
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let key = signing_key_from_seed(b"seed").unwrap();
        let input = SetInput::signed(&key, 17);
        assert_eq!(input.message.to_base64(), "MTc=");
        assert_eq!(
            input.signature.to_base64(),
            "TzEt4B35WA6zF5iNqUieOehEgw2MBwqoFdidZxHg0QFvuo0OlojyoQ5ZphE+COO2coAzNoxJZGN3H0bis26pCg=="
        );
    }

    #[test]
    fn test_signed_input_verifies() {
        let key = signing_key_from_seed(b"").unwrap();
        let input = SetInput::signed(&key, -123);
        assert_eq!(
            verify(
                input.message.as_slice(),
                input.signature.as_slice(),
                input.pub_key.as_slice(),
                -123
            ),
            Ok(())
        );
    }

    #[test]
    fn test_seed_too_long() {
        assert_eq!(
            signing_key_from_seed(&[1u8; 33]).unwrap_err(),
            SeedError::TooLong(33)
        );
        assert!(signing_key_from_seed(&[1u8; 32]).is_ok());
    }
}
