//! Signature verifier
//!
//! A submission is admitted only if its message is the canonical decimal
//! encoding of the claimed input and carries a valid Ed25519 signature under
//! the submitted key. Checks run in a fixed order so identical inputs always
//! produce the identical error:
//!
//! 1. fixed lengths and a non-empty message
//! 2. decimal decode of the message
//! 3. exact byte equality with the claimed input's encoding
//! 4. strict Ed25519 verification

use ed25519_dalek::{Signature, VerifyingKey};

use crate::encoding::{decode_decimal, encode_decimal};
use crate::error::{MalformedInput, VerificationError};
use crate::types::{InputValue, PublicKey, SignatureBytes, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Verify that `message`, `signature` and `public_key` agree and that the
/// message encodes `claimed_value`
pub fn verify(
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
    claimed_value: InputValue,
) -> Result<(), VerificationError> {
    verify_submission(message, signature, public_key, claimed_value).map(|_| ())
}

/// Same as [`verify`], returning the parsed public key on success
pub fn verify_submission(
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
    claimed_value: InputValue,
) -> Result<PublicKey, VerificationError> {
    let signature = parse_signature(signature)?;
    let public_key = parse_public_key(public_key)?;

    if message.is_empty() {
        return Err(VerificationError::Malformed(MalformedInput::EmptyMessage));
    }
    let decoded = decode_decimal(message).ok_or(MalformedInput::UndecodableMessage)?;
    if decoded != claimed_value || message != encode_decimal(claimed_value).as_slice() {
        return Err(VerificationError::ValueMismatch);
    }

    // A 32-byte string that is not a curve point cannot have signed anything
    let key = VerifyingKey::from_bytes(&public_key).map_err(|_| VerificationError::InvalidSignature)?;
    key.verify_strict(message, &Signature::from_bytes(&signature))
        .map_err(|_| VerificationError::InvalidSignature)?;

    Ok(public_key)
}

/// Check a public key has the scheme's fixed length
pub fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, MalformedInput> {
    bytes.try_into().map_err(|_| MalformedInput::PublicKeyLength {
        expected: PUBLIC_KEY_LENGTH,
        actual: bytes.len(),
    })
}

fn parse_signature(bytes: &[u8]) -> Result<SignatureBytes, MalformedInput> {
    bytes.try_into().map_err(|_| MalformedInput::SignatureLength {
        expected: SIGNATURE_LENGTH,
        actual: bytes.len(),
    })
}
