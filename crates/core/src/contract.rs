//! Contract state machine
//!
//! ```text
//! AwaitingInputs ──set_input(A)──► PartialA ──set_input(B)──┐
//!       │                                                    ▼
//!       └────────set_input(B)──► PartialB ──set_input(A)──► BothSet ──compare()──► winner
//! ```
//!
//! Every call either commits its whole effect or returns an error with the
//! instance untouched. The host applies calls one at a time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compare::{compare, ComparisonResult, TieBreak};
use crate::encoding::Binary;
use crate::error::ContractError;
use crate::msg::{
    AuthorizedKeys, ExecuteMsg, InputAResponse, InputBResponse, InstantiateMsg, QueryMsg,
    QueryResponse, Response, SetInput, StatusResponse,
};
use crate::store::{SlotStore, StoredInput};
use crate::types::{Address, Env, PartyRole, PublicKey};
use crate::verifier::{parse_public_key, verify_submission};

/// Log key carrying the winner's address
pub const WINNER_ATTRIBUTE: &str = "larger number belongs to";

/// Input-phase progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No input set
    AwaitingInputs,
    /// Only input A set
    PartialA,
    /// Only input B set
    PartialB,
    /// Both inputs set; comparison available
    BothSet,
}

/// Settings fixed at instantiation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractConfig {
    pub tie_break: TieBreak,
    pub query_inputs: bool,
    authorized_keys: [Option<PublicKey>; 2],
}

impl ContractConfig {
    fn from_msg(msg: InstantiateMsg) -> Result<Self, ContractError> {
        let AuthorizedKeys { a, b } = msg.authorized_keys;
        let parse = |key: Option<Binary>| {
            key.map(|k| parse_public_key(k.as_slice())).transpose()
        };
        Ok(Self {
            tie_break: msg.tie_break,
            query_inputs: msg.query_inputs,
            authorized_keys: [parse(a)?, parse(b)?],
        })
    }

    /// Key allowed to author `role`'s input, if restricted
    pub fn authorized_key(&self, role: PartyRole) -> Option<&PublicKey> {
        self.authorized_keys[role.index()].as_ref()
    }
}

/// A contract instance
#[derive(Clone, Debug)]
pub struct Contract {
    owner: Address,
    config: ContractConfig,
    slots: SlotStore,
    result: Option<ComparisonResult>,
}

impl Contract {
    /// Create an instance with both slots empty
    pub fn instantiate(env: &Env, msg: InstantiateMsg) -> Result<(Self, Response), ContractError> {
        let config = ContractConfig::from_msg(msg)?;
        debug!(owner = %env.sender, tie_break = ?config.tie_break, "contract instantiated");

        let contract = Self {
            owner: env.sender.clone(),
            config,
            slots: SlotStore::new(),
            result: None,
        };
        let response = Response::new()
            .add_attribute("action", "instantiate")
            .add_attribute("owner", &env.sender);
        Ok((contract, response))
    }

    /// Address that instantiated the contract
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Settings fixed at instantiation
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Current input phase
    pub fn phase(&self) -> Phase {
        match (
            self.slots.is_filled(PartyRole::A),
            self.slots.is_filled(PartyRole::B),
        ) {
            (false, false) => Phase::AwaitingInputs,
            (true, false) => Phase::PartialA,
            (false, true) => Phase::PartialB,
            (true, true) => Phase::BothSet,
        }
    }

    /// Winner of the comparison, once computed
    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    /// Dispatch a state-changing request
    pub fn execute(&mut self, env: &Env, msg: ExecuteMsg) -> Result<Response, ContractError> {
        match msg {
            ExecuteMsg::SetInputA(input) => self.set_input(env, PartyRole::A, &input),
            ExecuteMsg::SetInputB(input) => self.set_input(env, PartyRole::B, &input),
            ExecuteMsg::Compare {} => self.try_compare(),
        }
    }

    /// Verify a submission and store it in `role`'s slot
    pub fn set_input(
        &mut self,
        env: &Env,
        role: PartyRole,
        input: &SetInput,
    ) -> Result<Response, ContractError> {
        let public_key = verify_submission(
            input.message.as_slice(),
            input.signature.as_slice(),
            input.pub_key.as_slice(),
            input.input,
        )?;

        if let Some(expected) = self.config.authorized_key(role) {
            if *expected != public_key {
                return Err(ContractError::UnauthorizedKey(role));
            }
        }

        self.slots
            .set(role, input.input, public_key, env.sender.clone())?;
        debug!(%role, address = %env.sender, phase = ?self.phase(), "input set");

        Ok(Response::new()
            .add_attribute("action", "set_input")
            .add_attribute("role", role)
            .add_attribute("address", &env.sender))
    }

    /// Compare the stored inputs
    ///
    /// Fails with [`ContractError::InputsIncomplete`] before both inputs are
    /// set. Once a winner is found it is kept, so later calls return it
    /// unchanged.
    pub fn compare(&mut self) -> Result<ComparisonResult, ContractError> {
        if let Some(result) = &self.result {
            return Ok(result.clone());
        }

        let (a, b) = self.slots.both().ok_or(ContractError::InputsIncomplete)?;
        let winner_role =
            compare(a.value, b.value, self.config.tie_break).ok_or(ContractError::TiedInputs)?;
        let winner = match winner_role {
            PartyRole::A => a,
            PartyRole::B => b,
        };
        let result = ComparisonResult {
            winner_role,
            winner_address: winner.address.clone(),
        };

        debug!(winner = %result.winner_address, "comparison happened successfully");
        self.result = Some(result.clone());
        Ok(result)
    }

    fn try_compare(&mut self) -> Result<Response, ContractError> {
        let result = self.compare()?;
        let (a, b) = self.slots.both().ok_or(ContractError::InputsIncomplete)?;

        Ok(Response::new()
            .add_attribute("action", "compare")
            .add_attribute("address A", &a.address)
            .add_attribute("address B", &b.address)
            .add_attribute(WINNER_ATTRIBUTE, &result.winner_address))
    }

    /// Answer a read-only request
    pub fn query(&self, msg: &QueryMsg) -> Result<QueryResponse, ContractError> {
        match msg {
            QueryMsg::InputA {} => {
                let input = self.query_input(PartyRole::A)?;
                Ok(QueryResponse::InputA(InputAResponse {
                    input_a: input.value,
                    address_a: input.address.clone(),
                }))
            }
            QueryMsg::InputB {} => {
                let input = self.query_input(PartyRole::B)?;
                Ok(QueryResponse::InputB(InputBResponse {
                    input_b: input.value,
                    address_b: input.address.clone(),
                }))
            }
            QueryMsg::Status {} => Ok(QueryResponse::Status(StatusResponse {
                phase: self.phase(),
                winner: self.result.as_ref().map(|r| r.winner_address.clone()),
            })),
        }
    }

    /// Stored input for `role`
    ///
    /// Exposes the raw value; refused when the instance was created with
    /// `query_inputs = false`.
    pub fn query_input(&self, role: PartyRole) -> Result<&StoredInput, ContractError> {
        if !self.config.query_inputs {
            return Err(ContractError::QueryDisabled);
        }
        self.slots.get(role).ok_or(ContractError::InputNotSet(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MalformedInput, SlotError, VerificationError};
    use crate::signing::signing_key_from_seed;

    const KEY_A: &str = "GNBrKE1JwUDF9F1sR268gWbATvlxf5XWMZUS7OanKnw=";
    const SIG_A_17: &str =
        "TzEt4B35WA6zF5iNqUieOehEgw2MBwqoFdidZxHg0QFvuo0OlojyoQ5ZphE+COO2coAzNoxJZGN3H0bis26pCg==";
    const KEY_B: &str = "YYXgbomDWBcuN1d8r1aQTyhBpwqOpa32GlRaWiavyZA=";
    const SIG_B_3: &str =
        "z/fuZmYdoE0MJgqgCO+r96Nca/X8Yy6X/H+mtRqRhcINUC5zdYv+MDZd5BO6OE2ZCuxIVMnV5inR2huDWvEUDg==";
    const SIG_B_17: &str =
        "DEnj68Spr/DrczxUydcyu6iBlaYn/sAUEvowKTi7P5A8N3ET1p2Pskw3+XyC5PeKwK+MX+XUNn/EF1EcRPBtCg==";

    fn env(sender: &str) -> Env {
        Env::new("testing", 1, Address::new(sender))
    }

    fn submission(input: i64, sig: &str, key: &str) -> SetInput {
        SetInput::new(
            input,
            Binary::from_base64(sig).unwrap(),
            Binary::from_base64(key).unwrap(),
        )
    }

    fn input_a() -> SetInput {
        submission(17, SIG_A_17, KEY_A)
    }

    fn input_b() -> SetInput {
        submission(3, SIG_B_3, KEY_B)
    }

    fn instantiate(msg: InstantiateMsg) -> Contract {
        Contract::instantiate(&env("creator"), msg).unwrap().0
    }

    #[test]
    fn test_proper_instantiation() {
        let (contract, response) =
            Contract::instantiate(&env("creator"), InstantiateMsg::default()).unwrap();
        assert_eq!(contract.phase(), Phase::AwaitingInputs);
        assert_eq!(contract.owner(), &Address::new("creator"));
        assert_eq!(response.attribute("owner"), Some("creator"));
        assert!(contract.result().is_none());
    }

    #[test]
    fn test_set_input_a_and_query() {
        let mut contract = instantiate(InstantiateMsg::default());

        let response = contract
            .execute(&env("alice"), ExecuteMsg::SetInputA(input_a()))
            .unwrap();
        assert_eq!(response.attribute("role"), Some("a"));
        assert!(response.attributes.iter().all(|a| a.value != "17"));
        assert_eq!(contract.phase(), Phase::PartialA);

        let resp = contract.query(&QueryMsg::InputA {}).unwrap();
        assert_eq!(
            resp,
            QueryResponse::InputA(InputAResponse {
                input_a: 17,
                address_a: Address::new("alice"),
            })
        );
    }

    #[test]
    fn test_set_input_b_and_query() {
        let mut contract = instantiate(InstantiateMsg::default());

        contract
            .execute(&env("bob"), ExecuteMsg::SetInputB(input_b()))
            .unwrap();
        assert_eq!(contract.phase(), Phase::PartialB);

        match contract.query(&QueryMsg::InputB {}).unwrap() {
            QueryResponse::InputB(resp) => assert_eq!(resp.input_b, 3),
            other => panic!("unexpected response: {other:?}"),
        }
        assert_eq!(
            contract.query(&QueryMsg::InputA {}),
            Err(ContractError::InputNotSet(PartyRole::A))
        );
    }

    #[test]
    fn test_compare_discloses_winner() {
        let mut contract = instantiate(InstantiateMsg::default());
        contract
            .execute(&env("alice"), ExecuteMsg::SetInputA(input_a()))
            .unwrap();
        contract
            .execute(&env("bob"), ExecuteMsg::SetInputB(input_b()))
            .unwrap();
        assert_eq!(contract.phase(), Phase::BothSet);

        let response = contract.execute(&env("anyone"), ExecuteMsg::Compare {}).unwrap();
        assert_eq!(response.attribute(WINNER_ATTRIBUTE), Some("alice"));
        assert_eq!(response.attribute("address A"), Some("alice"));
        assert_eq!(response.attribute("address B"), Some("bob"));
        assert!(response
            .attributes
            .iter()
            .all(|a| a.value != "17" && a.value != "3"));
    }

    #[test]
    fn test_compare_is_idempotent() {
        let mut contract = instantiate(InstantiateMsg::default());
        contract.execute(&env("alice"), ExecuteMsg::SetInputA(input_a())).unwrap();
        contract.execute(&env("bob"), ExecuteMsg::SetInputB(input_b())).unwrap();

        let first = contract.compare().unwrap();
        assert_eq!(first.winner_role, PartyRole::A);
        for _ in 0..10 {
            assert_eq!(contract.compare().unwrap(), first);
        }
        match contract.query(&QueryMsg::Status {}).unwrap() {
            QueryResponse::Status(status) => {
                assert_eq!(status.phase, Phase::BothSet);
                assert_eq!(status.winner, Some(Address::new("alice")));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_cross_signed_input_rejected() {
        let mut contract = instantiate(InstantiateMsg::default());

        let err = contract
            .execute(&env("alice"), ExecuteMsg::SetInputA(submission(17, SIG_B_17, KEY_A)))
            .unwrap_err();
        assert_eq!(err, ContractError::Verification(VerificationError::InvalidSignature));
        assert!(err.to_string().contains("Invalid signature"));
        assert_eq!(contract.phase(), Phase::AwaitingInputs);
        assert_eq!(
            contract.query(&QueryMsg::InputA {}),
            Err(ContractError::InputNotSet(PartyRole::A))
        );
    }

    #[test]
    fn test_second_write_rejected() {
        let mut contract = instantiate(InstantiateMsg::default());
        contract.execute(&env("alice"), ExecuteMsg::SetInputA(input_a())).unwrap();

        // Validly signed by another key, still refused
        let err = contract
            .execute(&env("bob"), ExecuteMsg::SetInputA(submission(17, SIG_B_17, KEY_B)))
            .unwrap_err();
        assert_eq!(err, ContractError::Slot(SlotError::AlreadyFilled(PartyRole::A)));

        let stored = contract.query_input(PartyRole::A).unwrap();
        assert_eq!(stored.value, 17);
        assert_eq!(stored.address, Address::new("alice"));
    }

    #[test]
    fn test_compare_before_inputs() {
        let mut contract = instantiate(InstantiateMsg::default());
        assert_eq!(
            contract.execute(&env("alice"), ExecuteMsg::Compare {}),
            Err(ContractError::InputsIncomplete)
        );

        contract.execute(&env("alice"), ExecuteMsg::SetInputA(input_a())).unwrap();
        assert_eq!(contract.compare(), Err(ContractError::InputsIncomplete));
        assert_eq!(contract.phase(), Phase::PartialA);
    }

    #[test]
    fn test_tie_policies() {
        let key_a = signing_key_from_seed(b"alice").unwrap();
        let key_b = signing_key_from_seed(b"bob").unwrap();

        let mut contract = instantiate(InstantiateMsg::default());
        contract
            .execute(&env("alice"), ExecuteMsg::SetInputA(SetInput::signed(&key_a, 9)))
            .unwrap();
        contract
            .execute(&env("bob"), ExecuteMsg::SetInputB(SetInput::signed(&key_b, 9)))
            .unwrap();
        assert_eq!(contract.compare(), Err(ContractError::TiedInputs));
        assert_eq!(contract.compare(), Err(ContractError::TiedInputs));
        assert!(contract.result().is_none());

        let mut contract = instantiate(InstantiateMsg {
            tie_break: TieBreak::FavorB,
            ..Default::default()
        });
        contract
            .execute(&env("alice"), ExecuteMsg::SetInputA(SetInput::signed(&key_a, 9)))
            .unwrap();
        contract
            .execute(&env("bob"), ExecuteMsg::SetInputB(SetInput::signed(&key_b, 9)))
            .unwrap();
        assert_eq!(contract.compare().unwrap().winner_address, Address::new("bob"));
    }

    #[test]
    fn test_query_disabled() {
        let mut contract = instantiate(InstantiateMsg {
            query_inputs: false,
            ..Default::default()
        });
        contract.execute(&env("alice"), ExecuteMsg::SetInputA(input_a())).unwrap();

        assert_eq!(contract.query(&QueryMsg::InputA {}), Err(ContractError::QueryDisabled));
        assert!(contract.query(&QueryMsg::Status {}).is_ok());
    }

    #[test]
    fn test_authorized_keys() {
        let mut contract = instantiate(InstantiateMsg {
            authorized_keys: AuthorizedKeys {
                a: Some(Binary::from_base64(KEY_A).unwrap()),
                b: None,
            },
            ..Default::default()
        });

        // B's key, validly signed, in A's slot
        let err = contract
            .execute(&env("bob"), ExecuteMsg::SetInputA(submission(17, SIG_B_17, KEY_B)))
            .unwrap_err();
        assert_eq!(err, ContractError::UnauthorizedKey(PartyRole::A));
        assert_eq!(contract.phase(), Phase::AwaitingInputs);

        contract.execute(&env("alice"), ExecuteMsg::SetInputA(input_a())).unwrap();
        contract.execute(&env("bob"), ExecuteMsg::SetInputB(input_b())).unwrap();
        assert_eq!(contract.phase(), Phase::BothSet);
    }

    #[test]
    fn test_instantiate_rejects_bad_authorized_key() {
        let err = Contract::instantiate(
            &env("creator"),
            InstantiateMsg {
                authorized_keys: AuthorizedKeys {
                    a: None,
                    b: Some(Binary::new(vec![1, 2, 3])),
                },
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractError::from(MalformedInput::PublicKeyLength {
                expected: 32,
                actual: 3
            })
        );
    }

    #[test]
    fn test_failed_calls_leave_instance_usable() {
        let mut contract = instantiate(InstantiateMsg::default());
        let mut bad = input_a();
        bad.signature = Binary::new(vec![0u8; 10]);
        assert!(contract.execute(&env("alice"), ExecuteMsg::SetInputA(bad)).is_err());
        assert!(contract.execute(&env("alice"), ExecuteMsg::Compare {}).is_err());

        contract.execute(&env("alice"), ExecuteMsg::SetInputA(input_a())).unwrap();
        contract.execute(&env("bob"), ExecuteMsg::SetInputB(input_b())).unwrap();
        assert_eq!(contract.compare().unwrap().winner_role, PartyRole::A);
    }
}
