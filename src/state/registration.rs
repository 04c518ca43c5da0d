//! Validator registration records carried to the reserved system address

use crate::state::address::{Address, DEFAULT_ADDRESS_LENGTH};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The reserved system address receiving registration requests.
pub static REGISTRATION_ADDRESS: Lazy<Address> =
    Lazy::new(|| Address::from_bytes(vec![0u8; DEFAULT_ADDRESS_LENGTH]));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationAction {
    Register,
    Unregister,
}

/// A registration or unregistration request for a validator node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationData {
    #[serde(with = "crate::encoding::hex_bytes")]
    pub originator_public_key: Vec<u8>,
    #[serde(with = "crate::encoding::hex_bytes")]
    pub node_public_key: Vec<u8>,
    /// Round at which the action was requested
    pub round_index: i32,
    pub action: RegistrationAction,
    #[serde(with = "crate::encoding::biguint")]
    pub stake: BigUint,
}

/// How the processor recognises and handles registration transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPolicy {
    addresses: BTreeSet<Address>,
    /// Overwrite the decoded originator key with the sender address and the
    /// round index with the processing round before appending.
    pub stamp_sender_and_round: bool,
}

impl RegistrationPolicy {
    pub fn new(addresses: impl IntoIterator<Item = Address>, stamp_sender_and_round: bool) -> Self {
        RegistrationPolicy {
            addresses: addresses.into_iter().collect(),
            stamp_sender_and_round,
        }
    }

    pub fn is_registration_address(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self::new([REGISTRATION_ADDRESS.clone()], false)
    }
}
