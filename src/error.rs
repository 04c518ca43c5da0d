//! Error types for AccountChain

use thiserror::Error;

/// Failure reported by a collaborator of the transaction processor
/// (account store, journal, codec, address converter, contract engine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Journal error: {0}")]
    JournalError(String),
    #[error("Codec error: {0}")]
    CodecError(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Balance underflow: balance {balance} is lower than {amount}")]
    BalanceUnderflow { balance: String, amount: String },
    #[error("Nonce overflow: account nonce {0} cannot be advanced")]
    NonceOverflow(u64),
    #[error("Contract execution error: {0}")]
    ContractError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for ChainError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        ChainError::CodecError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::CodecError(err.to_string())
    }
}

/// Which side of a transaction an account lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSide {
    Sender,
    Receiver,
}

impl std::fmt::Display for AccountSide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AccountSide::Sender => write!(f, "sender"),
            AccountSide::Receiver => write!(f, "receiver"),
        }
    }
}

/// Errors returned by the transaction processor. Each variant is a distinct
/// kind so callers can match on it instead of on message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("nil accounts adapter")]
    NilAccountsAdapter,
    #[error("nil hasher")]
    NilHasher,
    #[error("nil address converter")]
    NilAddressConverter,
    #[error("nil marshalizer")]
    NilMarshalizer,

    #[error("nil transaction")]
    NilTransaction,

    #[error("address conversion failed: {0}")]
    AddressConversion(#[source] ChainError),

    #[error("account lookup failed for {side}: {source}")]
    AccountLookup {
        side: AccountSide,
        #[source]
        source: ChainError,
    },

    #[error("higher nonce in transaction: account nonce {account}, transaction nonce {transaction}")]
    HigherNonceInTransaction { account: u64, transaction: u64 },
    #[error("lower nonce in transaction: account nonce {account}, transaction nonce {transaction}")]
    LowerNonceInTransaction { account: u64, transaction: u64 },
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: String, required: String },

    #[error("no virtual machine available to execute contract call")]
    NoVm,
    #[error(transparent)]
    ContractHandler(ChainError),

    #[error("balance transfer failed: {0}")]
    BalanceTransfer(#[source] ChainError),
    #[error("registration data decode failed: {0}")]
    RegistrationDecode(#[source] ChainError),
    #[error("registration data append failed: {0}")]
    RegistrationAppend(#[source] ChainError),
    #[error("sender nonce advance failed: {0}")]
    NonceAdvance(#[source] ChainError),
}

impl ProcessError {
    /// True when the transaction may become valid later on this node (its
    /// nonce is ahead of the sender account). Holding it is a pool decision.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ProcessError::HigherNonceInTransaction { .. })
    }

    /// True for the rejections raised before any state mutation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ProcessError::NilTransaction
                | ProcessError::AddressConversion(_)
                | ProcessError::AccountLookup { .. }
                | ProcessError::HigherNonceInTransaction { .. }
                | ProcessError::LowerNonceInTransaction { .. }
                | ProcessError::InsufficientFunds { .. }
        )
    }
}

/// Errors returned when applying a block of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("transaction {index} rejected: {source}")]
    Transaction {
        index: usize,
        #[source]
        source: ProcessError,
    },
    #[error("journal failure: {0}")]
    Journal(#[source] ChainError),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_higher_nonce_is_retriable() {
        let higher = ProcessError::HigherNonceInTransaction {
            account: 1,
            transaction: 2,
        };
        let lower = ProcessError::LowerNonceInTransaction {
            account: 2,
            transaction: 1,
        };
        assert!(higher.is_retriable());
        assert!(!lower.is_retriable());
        assert!(!ProcessError::NoVm.is_retriable());
    }

    #[test]
    fn test_contract_handler_error_is_verbatim() {
        let inner = ChainError::ContractError("out of gas".to_string());
        let err = ProcessError::ContractHandler(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_lookup_error_names_side() {
        let err = ProcessError::AccountLookup {
            side: AccountSide::Receiver,
            source: ChainError::StorageError("trie missing".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "account lookup failed for receiver: Storage error: trie missing"
        );
    }

    #[test]
    fn test_bincode_error_converts_to_codec_error() {
        let err: Box<bincode::ErrorKind> = Box::new(bincode::ErrorKind::SizeLimit);
        assert!(matches!(ChainError::from(err), ChainError::CodecError(_)));
    }
}
