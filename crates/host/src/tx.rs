//! Transaction envelope

use millionaire_core::{Address, ExecuteMsg, SetInput};
use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

/// 32-byte hash
pub type Hash = [u8; 32];

/// Execute request together with its host-assigned sender
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// Host-assigned sender
    pub sender: Address,
    /// Decoded request
    pub msg: ExecuteMsg,
}

/// Kind byte of a request that never decoded into a transaction
const RAW_REQUEST_KIND: u8 = 0xff;

impl Transaction {
    /// Transaction from `sender`
    pub fn new(sender: impl Into<Address>, msg: ExecuteMsg) -> Self {
        Self {
            sender: sender.into(),
            msg,
        }
    }

    /// Compute transaction hash
    pub fn hash(&self) -> Hash {
        let mut hasher = Keccak::v256();

        let sender = self.sender.as_str().as_bytes();
        hasher.update(&(sender.len() as u64).to_le_bytes());
        hasher.update(sender);

        match &self.msg {
            ExecuteMsg::SetInputA(input) => {
                hasher.update(&[0u8]);
                update_input(&mut hasher, input);
            }
            ExecuteMsg::SetInputB(input) => {
                hasher.update(&[1u8]);
                update_input(&mut hasher, input);
            }
            ExecuteMsg::Compare {} => hasher.update(&[2u8]),
        }

        let mut output = [0u8; 32];
        hasher.finalize(&mut output);
        output
    }
}

/// Hash of a request rejected before it became a [`Transaction`]
pub fn request_hash(sender: &Address, request: &[u8]) -> Hash {
    let mut hasher = Keccak::v256();

    let sender = sender.as_str().as_bytes();
    hasher.update(&(sender.len() as u64).to_le_bytes());
    hasher.update(sender);
    hasher.update(&[RAW_REQUEST_KIND]);
    hasher.update(&(request.len() as u64).to_le_bytes());
    hasher.update(request);

    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

fn update_input(hasher: &mut Keccak, input: &SetInput) {
    hasher.update(&input.input.to_le_bytes());
    for field in [&input.message, &input.signature, &input.pub_key] {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field.as_slice());
    }
}
