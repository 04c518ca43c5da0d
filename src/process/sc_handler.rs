//! Contract dispatch hook
//!
//! The virtual machine and the transaction processor need each other at
//! construction time, so the processor starts without a handler and the VM
//! module installs itself once it exists.

use crate::error::Result;
use crate::state::AccountsAdapter;
use crate::transaction::Transaction;
use std::fmt;
use std::sync::Arc;

/// Executes transactions whose receiver carries contract code. The handler
/// owns every state effect of the call, nonce included.
pub trait ContractHandler: Send + Sync {
    fn execute(&self, accounts: &dyn AccountsAdapter, tx: &Transaction) -> Result<()>;
}

impl<F> ContractHandler for F
where
    F: Fn(&dyn AccountsAdapter, &Transaction) -> Result<()> + Send + Sync,
{
    fn execute(&self, accounts: &dyn AccountsAdapter, tx: &Transaction) -> Result<()> {
        self(accounts, tx)
    }
}

/// Whether a contract handler has been wired.
#[derive(Clone, Default)]
pub enum ContractHandlerState {
    #[default]
    Unset,
    Configured(Arc<dyn ContractHandler>),
}

impl ContractHandlerState {
    pub fn is_configured(&self) -> bool {
        matches!(self, ContractHandlerState::Configured(_))
    }

    pub fn handler(&self) -> Option<&Arc<dyn ContractHandler>> {
        match self {
            ContractHandlerState::Unset => None,
            ContractHandlerState::Configured(handler) => Some(handler),
        }
    }
}

impl fmt::Debug for ContractHandlerState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContractHandlerState::Unset => write!(f, "Unset"),
            ContractHandlerState::Configured(_) => write!(f, "Configured"),
        }
    }
}
