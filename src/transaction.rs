//! Transaction type for AccountChain

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// A value transfer, contract call or registration request, as received.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    #[serde(with = "crate::encoding::biguint")]
    pub value: BigUint,
    #[serde(with = "crate::encoding::hex_bytes")]
    pub rcv_addr: Vec<u8>,
    #[serde(with = "crate::encoding::hex_bytes")]
    pub snd_addr: Vec<u8>,
    /// Registration data or contract call arguments
    #[serde(default, with = "crate::encoding::hex_bytes")]
    pub data: Vec<u8>,
}

impl Transaction {
    pub fn new(
        nonce: u64,
        snd_addr: impl Into<Vec<u8>>,
        rcv_addr: impl Into<Vec<u8>>,
        value: impl Into<BigUint>,
    ) -> Self {
        Transaction {
            nonce,
            value: value.into(),
            rcv_addr: rcv_addr.into(),
            snd_addr: snd_addr.into(),
            data: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}
