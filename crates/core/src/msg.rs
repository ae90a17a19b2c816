//! Messages and responses exchanged with the host
//!
//! Requests are decoded once at the boundary into these closed enums. The
//! JSON shape is snake_case and externally tagged, e.g.
//! `{"set_input_a": {"input": 17, "message": "MTc=", ...}}` or `{"compare": {}}`.

use serde::{Deserialize, Serialize};

use crate::compare::TieBreak;
use crate::contract::Phase;
use crate::encoding::{encode_decimal, Binary};
use crate::error::MalformedInput;
use crate::types::{Address, InputValue, PartyRole};

/// Instantiation parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    /// Policy for equal inputs
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Whether `input_a`/`input_b` queries answer; disable for confidential deployments
    #[serde(default = "default_query_inputs")]
    pub query_inputs: bool,
    /// Keys allowed to author each role's input; any key when unset
    #[serde(default)]
    pub authorized_keys: AuthorizedKeys,
}

const fn default_query_inputs() -> bool {
    true
}

impl Default for InstantiateMsg {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            query_inputs: default_query_inputs(),
            authorized_keys: AuthorizedKeys::default(),
        }
    }
}

/// Optional per-role key allowlist
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedKeys {
    /// Key for input a
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Binary>,
    /// Key for input b
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Binary>,
}

/// Signed input submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInput {
    /// Claimed value
    pub input: InputValue,
    /// Signed bytes: the decimal ASCII form of `input`
    pub message: Binary,
    /// Ed25519 signature over `message`
    pub signature: Binary,
    /// Ed25519 public key of the author
    pub pub_key: Binary,
}

impl SetInput {
    /// Build a submission for `input` from a detached signature
    pub fn new(input: InputValue, signature: impl Into<Binary>, pub_key: impl Into<Binary>) -> Self {
        Self {
            input,
            message: Binary::new(encode_decimal(input)),
            signature: signature.into(),
            pub_key: pub_key.into(),
        }
    }
}

/// State-changing requests
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Submit input a
    SetInputA(SetInput),
    /// Submit input b
    SetInputB(SetInput),
    /// Determine and disclose the larger input's author
    Compare {},
}

impl ExecuteMsg {
    /// Submission for `role`
    pub fn set_input(role: PartyRole, input: SetInput) -> Self {
        match role {
            PartyRole::A => Self::SetInputA(input),
            PartyRole::B => Self::SetInputB(input),
        }
    }

    /// Short name used in logs
    pub const fn action(&self) -> &'static str {
        match self {
            Self::SetInputA(_) => "set_input_a",
            Self::SetInputB(_) => "set_input_b",
            Self::Compare {} => "compare",
        }
    }
}

/// [`SetInput`] as received, byte fields still base64 text
///
/// Base64 is decoded by the `TryFrom` conversion into [`SetInput`]; a bad
/// encoding is a [`MalformedInput`] the host records as a failed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WireSetInput {
    /// Claimed value
    pub input: InputValue,
    /// Base64 message
    pub message: String,
    /// Base64 signature
    pub signature: String,
    /// Base64 public key
    pub pub_key: String,
}

impl TryFrom<WireSetInput> for SetInput {
    type Error = MalformedInput;

    fn try_from(wire: WireSetInput) -> Result<Self, Self::Error> {
        let decode = |field: &'static str, encoded: &str| {
            Binary::from_base64(encoded).map_err(|_| MalformedInput::InvalidBase64(field))
        };
        Ok(Self {
            input: wire.input,
            message: decode("message", &wire.message)?,
            signature: decode("signature", &wire.signature)?,
            pub_key: decode("pub_key", &wire.pub_key)?,
        })
    }
}

/// [`ExecuteMsg`] as received, same JSON shape
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireExecuteMsg {
    /// Submit input a
    SetInputA(WireSetInput),
    /// Submit input b
    SetInputB(WireSetInput),
    /// Compare
    Compare {},
}

impl WireExecuteMsg {
    /// Short name used in logs
    pub const fn action(&self) -> &'static str {
        match self {
            Self::SetInputA(_) => "set_input_a",
            Self::SetInputB(_) => "set_input_b",
            Self::Compare {} => "compare",
        }
    }
}

impl TryFrom<WireExecuteMsg> for ExecuteMsg {
    type Error = MalformedInput;

    fn try_from(wire: WireExecuteMsg) -> Result<Self, Self::Error> {
        Ok(match wire {
            WireExecuteMsg::SetInputA(input) => Self::SetInputA(input.try_into()?),
            WireExecuteMsg::SetInputB(input) => Self::SetInputB(input.try_into()?),
            WireExecuteMsg::Compare {} => Self::Compare {},
        })
    }
}

/// Read-only requests
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    /// Stored input a and its author
    InputA {},
    /// Stored input b and its author
    InputB {},
    /// Phase and winner
    Status {},
}

impl QueryMsg {
    /// Input query for `role`
    pub const fn input(role: PartyRole) -> Self {
        match role {
            PartyRole::A => Self::InputA {},
            PartyRole::B => Self::InputB {},
        }
    }
}

/// Answer to [`QueryMsg::InputA`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAResponse {
    /// Stored value
    pub input_a: InputValue,
    /// Sender that submitted it
    pub address_a: Address,
}

/// Answer to [`QueryMsg::InputB`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBResponse {
    /// Stored value
    pub input_b: InputValue,
    /// Sender that submitted it
    pub address_b: Address,
}

/// Protocol progress, without values
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Slot occupancy
    pub phase: Phase,
    /// Winner, once a comparison has succeeded
    pub winner: Option<Address>,
}

/// Any query answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    /// Input a
    InputA(InputAResponse),
    /// Input b
    InputB(InputBResponse),
    /// Status
    Status(StatusResponse),
}

/// Key/value log entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Entry name
    pub key: String,
    /// Entry value
    pub value: String,
}

impl Attribute {
    /// Entry `key = value`
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Host-visible outcome of a successful call
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Log entries in emission order
    pub attributes: Vec<Attribute>,
    /// Optional payload
    pub data: Option<Binary>,
}

impl Response {
    /// Empty response
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a log entry
    pub fn add_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(Attribute::new(key, value));
        self
    }

    /// Value of the first entry named `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}
