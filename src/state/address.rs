//! Account addresses and the converter that builds them from raw bytes

use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default address length in bytes.
pub const DEFAULT_ADDRESS_LENGTH: usize = 32;

/// Canonical account identity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(#[serde(with = "crate::encoding::hex_bytes")] Vec<u8>);

impl Address {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Address(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Converts raw transaction address bytes into [`Address`] values.
pub trait AddressConverter: Send + Sync {
    /// Build an address from the bytes carried by a transaction.
    fn create_address_from_bytes(&self, bytes: &[u8]) -> Result<Address, ChainError>;

    /// Build an address from its hex representation (optional `0x` prefix).
    fn create_address_from_hex(&self, hex_str: &str) -> Result<Address, ChainError> {
        let trimmed = hex_str.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(trimmed)
            .map_err(|e| ChainError::InvalidAddress(format!("Invalid hex address: {}", e)))?;
        self.create_address_from_bytes(&bytes)
    }

    /// Expected address length in bytes; 0 accepts any non-empty length.
    fn address_len(&self) -> usize;
}

/// Converter that takes the bytes as-is after a length check.
#[derive(Debug, Clone, Copy)]
pub struct PlainAddressConverter {
    length: usize,
}

impl PlainAddressConverter {
    pub fn new(length: usize) -> Self {
        PlainAddressConverter { length }
    }
}

impl Default for PlainAddressConverter {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_LENGTH)
    }
}

impl AddressConverter for PlainAddressConverter {
    fn create_address_from_bytes(&self, bytes: &[u8]) -> Result<Address, ChainError> {
        if bytes.is_empty() {
            return Err(ChainError::InvalidAddress(
                "Address cannot be empty".to_string(),
            ));
        }
        if self.length != 0 && bytes.len() != self.length {
            return Err(ChainError::InvalidAddress(format!(
                "Address must be {} bytes, got {}",
                self.length,
                bytes.len()
            )));
        }
        Ok(Address::from_bytes(bytes))
    }

    fn address_len(&self) -> usize {
        self.length
    }
}
