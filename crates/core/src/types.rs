//! Common types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric input submitted by a party
pub type InputValue = i64;

/// Ed25519 public key length in bytes
pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// Ed25519 signature length in bytes
pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Raw Ed25519 public key
pub type PublicKey = [u8; PUBLIC_KEY_LENGTH];

/// Raw Ed25519 signature
pub type SignatureBytes = [u8; SIGNATURE_LENGTH];

/// Opaque sender identity supplied by the host
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap a host-supplied identity
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Borrow the identity as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Protocol participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    /// First party, fills `input_a`
    A,
    /// Second party, fills `input_b`
    B,
}

impl PartyRole {
    /// Both roles, in slot order
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// The opposing role
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Lowercase tag used in logs and diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution context for a single contract call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Env {
    /// Chain the contract runs on
    pub chain_id: String,
    /// Height at which the call executes
    pub height: u64,
    /// Sender of the transaction or query
    pub sender: Address,
}

impl Env {
    /// Create a new execution context
    pub fn new(chain_id: impl Into<String>, height: u64, sender: Address) -> Self {
        Self {
            chain_id: chain_id.into(),
            height,
            sender,
        }
    }
}
