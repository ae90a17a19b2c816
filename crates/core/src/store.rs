//! Input slot store

use crate::error::SlotError;
use crate::types::{Address, InputValue, PartyRole, PublicKey};

/// Verified input bound to its author
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredInput {
    pub value: InputValue,
    pub public_key: PublicKey,
    pub address: Address,
}

/// Per-role storage cell
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Empty,
    Filled(StoredInput),
}

/// One slot per role
///
/// A slot goes from `Empty` to `Filled` once and is never cleared or
/// overwritten. The occupancy check is what keeps a second writer for the
/// same role from racing the first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotStore {
    slots: [Slot; 2],
}

impl SlotStore {
    /// Create a store with both slots empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the slot for `role`
    pub fn set(
        &mut self,
        role: PartyRole,
        value: InputValue,
        public_key: PublicKey,
        address: Address,
    ) -> Result<(), SlotError> {
        let slot = &mut self.slots[role.index()];
        if matches!(slot, Slot::Filled(_)) {
            return Err(SlotError::AlreadyFilled(role));
        }
        *slot = Slot::Filled(StoredInput {
            value,
            public_key,
            address,
        });
        Ok(())
    }

    /// Read the slot for `role`
    pub fn get(&self, role: PartyRole) -> Option<&StoredInput> {
        match &self.slots[role.index()] {
            Slot::Filled(input) => Some(input),
            Slot::Empty => None,
        }
    }

    /// Whether `role` has a stored input
    pub fn is_filled(&self, role: PartyRole) -> bool {
        self.get(role).is_some()
    }

    /// Both inputs, once both are set
    pub fn both(&self) -> Option<(&StoredInput, &StoredInput)> {
        Some((self.get(PartyRole::A)?, self.get(PartyRole::B)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut store = SlotStore::new();
        assert!(store.get(PartyRole::A).is_none());

        store.set(PartyRole::A, 17, [1u8; 32], "alice".into()).unwrap();

        let input = store.get(PartyRole::A).unwrap();
        assert_eq!(input.value, 17);
        assert_eq!(input.public_key, [1u8; 32]);
        assert_eq!(input.address, Address::new("alice"));
        assert!(!store.is_filled(PartyRole::B));
        assert!(store.both().is_none());
    }

    #[test]
    fn test_no_overwrite() {
        let mut store = SlotStore::new();
        store.set(PartyRole::B, 3, [2u8; 32], "bob".into()).unwrap();

        let err = store
            .set(PartyRole::B, 99, [3u8; 32], "mallory".into())
            .unwrap_err();
        assert_eq!(err, SlotError::AlreadyFilled(PartyRole::B));

        let input = store.get(PartyRole::B).unwrap();
        assert_eq!(input.value, 3);
        assert_eq!(input.address, Address::new("bob"));
    }

    #[test]
    fn test_both() {
        let mut store = SlotStore::new();
        store.set(PartyRole::B, 3, [2u8; 32], "bob".into()).unwrap();
        store.set(PartyRole::A, 17, [1u8; 32], "alice".into()).unwrap();

        let (a, b) = store.both().unwrap();
        assert_eq!((a.value, b.value), (17, 3));
    }
}
