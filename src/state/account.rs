use crate::state::address::Address;
use crate::state::registration::RegistrationData;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Per-address ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub nonce: u64,
    #[serde(with = "crate::encoding::biguint")]
    pub balance: BigUint,
    /// Deployed contract code; non-empty marks the account as a contract
    #[serde(default, with = "crate::encoding::hex_bytes")]
    pub code: Vec<u8>,
    #[serde(default)]
    pub registration_data: Vec<RegistrationData>,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Account {
            address,
            nonce: 0,
            balance: BigUint::zero(),
            code: Vec::new(),
            registration_data: Vec::new(),
        }
    }

    pub fn with_balance(mut self, balance: impl Into<BigUint>) -> Self {
        self.balance = balance.into();
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_code(mut self, code: Vec<u8>) -> Self {
        self.code = code;
        self
    }

    pub fn is_contract(&self) -> bool {
        !self.code.is_empty()
    }
}
