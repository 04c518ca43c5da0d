//! Serialization codecs for ledger records
//!
//! The processor only ever decodes [`RegistrationData`]; the other directions
//! exist for collaborators that build transactions or fingerprint state.

use crate::error::{ChainError, Result};
use crate::state::{Account, RegistrationData};
use crate::transaction::Transaction;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Maximum encoded record size in bytes (100KB) to prevent DoS
pub const MAX_ENCODED_SIZE: u64 = 100_000;

pub trait Marshalizer: Send + Sync {
    fn marshal_registration(&self, data: &RegistrationData) -> Result<Vec<u8>>;
    fn unmarshal_registration(&self, bytes: &[u8]) -> Result<RegistrationData>;
    fn marshal_transaction(&self, tx: &Transaction) -> Result<Vec<u8>>;
    fn unmarshal_transaction(&self, bytes: &[u8]) -> Result<Transaction>;
    fn marshal_account(&self, account: &Account) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarshalizerKind {
    #[default]
    Bincode,
    Json,
}

impl MarshalizerKind {
    pub fn build(self) -> Box<dyn Marshalizer> {
        match self {
            MarshalizerKind::Bincode => Box::new(BincodeMarshalizer::default()),
            MarshalizerKind::Json => Box::new(JsonMarshalizer),
        }
    }
}

/// Fixed-width little-endian bincode. Decoding is size-limited and rejects
/// trailing bytes; together with the canonical amount encoding every record
/// has exactly one accepted encoding.
#[derive(Debug, Clone, Copy)]
pub struct BincodeMarshalizer {
    limit: u64,
}

impl Default for BincodeMarshalizer {
    fn default() -> Self {
        BincodeMarshalizer {
            limit: MAX_ENCODED_SIZE,
        }
    }
}

impl BincodeMarshalizer {
    pub fn with_limit(limit: u64) -> Self {
        BincodeMarshalizer { limit }
    }

    fn encode_options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_little_endian()
    }

    /// Only decoding is size-limited; encoded local state such as the
    /// registration account may exceed the limit.
    fn decode_options(&self) -> impl Options {
        Self::encode_options()
            .with_limit(self.limit)
            .reject_trailing_bytes()
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(Self::encode_options().serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(self.decode_options().deserialize(bytes)?)
    }
}

impl Marshalizer for BincodeMarshalizer {
    fn marshal_registration(&self, data: &RegistrationData) -> Result<Vec<u8>> {
        self.encode(data)
    }

    fn unmarshal_registration(&self, bytes: &[u8]) -> Result<RegistrationData> {
        self.decode(bytes)
    }

    fn marshal_transaction(&self, tx: &Transaction) -> Result<Vec<u8>> {
        self.encode(tx)
    }

    fn unmarshal_transaction(&self, bytes: &[u8]) -> Result<Transaction> {
        self.decode(bytes)
    }

    fn marshal_account(&self, account: &Account) -> Result<Vec<u8>> {
        self.encode(account)
    }
}

/// JSON codec, handy for debugging and tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshalizer;

impl JsonMarshalizer {
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        if bytes.len() as u64 > MAX_ENCODED_SIZE {
            return Err(ChainError::CodecError(format!(
                "Payload too large: {} bytes (max: {})",
                bytes.len(),
                MAX_ENCODED_SIZE
            )));
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Marshalizer for JsonMarshalizer {
    fn marshal_registration(&self, data: &RegistrationData) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(data)?)
    }

    fn unmarshal_registration(&self, bytes: &[u8]) -> Result<RegistrationData> {
        Self::decode(bytes)
    }

    fn marshal_transaction(&self, tx: &Transaction) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(tx)?)
    }

    fn unmarshal_transaction(&self, bytes: &[u8]) -> Result<Transaction> {
        Self::decode(bytes)
    }

    fn marshal_account(&self, account: &Account) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(account)?)
    }
}
