//! Configuration management for AccountChain

use crate::error::ChainError;
use crate::marshal::{Marshalizer, MarshalizerKind};
use crate::state::{
    Address, AddressConverter, PlainAddressConverter, RegistrationPolicy, DEFAULT_ADDRESS_LENGTH,
    REGISTRATION_ADDRESS,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub address: AddressConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressConfig {
    /// Address length in bytes; 0 accepts any non-empty address
    #[serde(default = "default_address_length")]
    pub length: usize,
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            length: default_address_length(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub marshalizer: MarshalizerKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Hex encoded reserved registration addresses
    #[serde(default = "default_registration_addresses")]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub stamp_sender_and_round: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            addresses: default_registration_addresses(),
            stamp_sender_and_round: false,
        }
    }
}

fn default_address_length() -> usize {
    DEFAULT_ADDRESS_LENGTH
}

fn default_registration_addresses() -> Vec<String> {
    vec![REGISTRATION_ADDRESS.to_hex()]
}

impl Config {
    pub fn address_converter(&self) -> Arc<dyn AddressConverter> {
        Arc::new(PlainAddressConverter::new(self.address.length))
    }

    pub fn marshalizer(&self) -> Arc<dyn Marshalizer> {
        Arc::from(self.codec.marshalizer.build())
    }

    pub fn registration_addresses(&self) -> Result<Vec<Address>, ChainError> {
        let converter = PlainAddressConverter::new(self.address.length);
        self.registration
            .addresses
            .iter()
            .map(|hex_addr| {
                converter.create_address_from_hex(hex_addr).map_err(|e| {
                    ChainError::ConfigError(format!(
                        "registration.addresses entry {:?}: {}",
                        hex_addr, e
                    ))
                })
            })
            .collect()
    }

    pub fn registration_policy(&self) -> Result<RegistrationPolicy, ChainError> {
        Ok(RegistrationPolicy::new(
            self.registration_addresses()?,
            self.registration.stamp_sender_and_round,
        ))
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if self.registration.addresses.is_empty() {
            return Err(ChainError::ConfigError(
                "registration.addresses must contain at least one address".to_string(),
            ));
        }
        self.registration_addresses()?;
        Ok(())
    }
}

/// Load the configuration at `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let path = path.as_ref();
    let config: Config = if path.exists() {
        let config_str = fs::read_to_string(path)?;
        toml::from_str(&config_str)
            .map_err(|e| ChainError::ConfigError(format!("{}: {}", path.display(), e)))?
    } else {
        Config::default()
    };

    config.validate()?;
    Ok(config)
}
