//! Account store abstraction and the in-memory journaled implementation

use crate::error::{ChainError, Result};
use crate::hashing::Hasher;
use crate::marshal::Marshalizer;
use crate::state::account::Account;
use crate::state::address::{Address, AddressConverter};
use crate::state::journal::{Journal, JournalEntry};
use crate::state::registration::RegistrationData;
use num_bigint::BigUint;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// A borrowed view of one account whose writes are recorded in the store's
/// journal. Two handles for the same address share the same backing account.
pub trait JournalizedAccount: Send + Sync {
    fn address(&self) -> &Address;
    fn nonce(&self) -> u64;
    fn balance(&self) -> BigUint;
    fn code(&self) -> Vec<u8>;
    fn registration_data(&self) -> Vec<RegistrationData>;

    fn has_code(&self) -> bool {
        !self.code().is_empty()
    }

    fn set_nonce_with_journal(&self, nonce: u64) -> Result<()>;
    fn set_balance_with_journal(&self, balance: BigUint) -> Result<()>;
    fn set_code_with_journal(&self, code: Vec<u8>) -> Result<()>;
    fn append_registration_data_with_journal(&self, data: RegistrationData) -> Result<()>;
}

pub type AccountHandle = Arc<dyn JournalizedAccount>;

/// Journaled account store consumed by the transaction processor.
pub trait AccountsAdapter: Send + Sync {
    /// Fetch the account for `address`, creating an empty one on first reference.
    fn get_journalized_account(&self, address: &Address) -> Result<AccountHandle>;

    /// Current journal length, usable as a snapshot marker.
    fn journal_len(&self) -> usize;

    /// Undo every write recorded after `snapshot`.
    fn revert_to_snapshot(&self, snapshot: usize) -> Result<()>;

    /// Make every journaled write permanent.
    fn commit(&self) -> Result<()>;
}

type SharedAccount = Arc<RwLock<Account>>;

/// In-memory account store keyed by address.
#[derive(Default)]
pub struct InMemoryAccounts {
    accounts: RwLock<BTreeMap<Address, SharedAccount>>,
    journal: Arc<Mutex<Journal>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account outside of the journal (genesis seeding).
    pub fn seed(&self, account: Account) {
        let address = account.address.clone();
        self.accounts
            .write()
            .insert(address, Arc::new(RwLock::new(account)));
    }

    /// Seed an account whose address must be one `converter` would produce
    /// from transaction bytes; anything else could never be reached.
    pub fn seed_checked(&self, mut account: Account, converter: &dyn AddressConverter) -> Result<()> {
        let address = converter
            .create_address_from_bytes(account.address.as_bytes())
            .map_err(|e| {
                ChainError::InvalidAddress(format!("genesis account {}: {}", account.address, e))
            })?;
        account.address = address;
        self.seed(account);
        Ok(())
    }

    /// A copy of the account currently stored for `address`.
    pub fn account(&self, address: &Address) -> Option<Account> {
        self.accounts.read().get(address).map(|a| a.read().clone())
    }

    /// Copies of all accounts, ordered by address.
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts
            .read()
            .values()
            .map(|a| a.read().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Deterministic fingerprint of the whole state: the hash of the
    /// concatenated per-account hashes in address order.
    pub fn root_hash(&self, hasher: &dyn Hasher, marshalizer: &dyn Marshalizer) -> Result<Vec<u8>> {
        let accounts = self.accounts.read();
        if accounts.is_empty() {
            return Ok(hasher.empty_hash());
        }
        let mut leaves = Vec::with_capacity(accounts.len() * hasher.size());
        for account in accounts.values() {
            let encoded = marshalizer.marshal_account(&account.read())?;
            leaves.extend_from_slice(&hasher.compute(&encoded));
        }
        Ok(hasher.compute(&leaves))
    }

    fn undo(&self, entry: JournalEntry) -> Result<()> {
        let mut accounts = self.accounts.write();
        if let JournalEntry::Created { address } = &entry {
            accounts.remove(address);
            return Ok(());
        }

        let shared = accounts.get(entry.address()).cloned().ok_or_else(|| {
            ChainError::JournalError(format!(
                "Account {} missing while reverting journal",
                entry.address()
            ))
        })?;
        let mut account = shared.write();
        match entry {
            JournalEntry::Created { .. } => {}
            JournalEntry::Nonce { previous, .. } => account.nonce = previous,
            JournalEntry::Balance { previous, .. } => account.balance = previous,
            JournalEntry::Code { previous, .. } => account.code = previous,
            JournalEntry::RegistrationAppended { address } => {
                if account.registration_data.pop().is_none() {
                    return Err(ChainError::JournalError(format!(
                        "No registration record to remove from {}",
                        address
                    )));
                }
            }
        }
        Ok(())
    }
}

impl AccountsAdapter for InMemoryAccounts {
    fn get_journalized_account(&self, address: &Address) -> Result<AccountHandle> {
        let mut accounts = self.accounts.write();
        let account = match accounts.get(address) {
            Some(existing) => existing.clone(),
            None => {
                let created = Arc::new(RwLock::new(Account::new(address.clone())));
                accounts.insert(address.clone(), created.clone());
                self.journal.lock().push(JournalEntry::Created {
                    address: address.clone(),
                });
                trace!(address = %address, "created account");
                created
            }
        };

        Ok(Arc::new(JournalizedAccountWrap {
            address: address.clone(),
            account,
            journal: self.journal.clone(),
        }))
    }

    fn journal_len(&self) -> usize {
        self.journal.lock().len()
    }

    fn revert_to_snapshot(&self, snapshot: usize) -> Result<()> {
        let undone = self.journal.lock().take_since(snapshot).ok_or_else(|| {
            ChainError::JournalError(format!("Snapshot {} is beyond the journal", snapshot))
        })?;
        trace!(snapshot, entries = undone.len(), "reverting journal");
        for entry in undone {
            self.undo(entry)?;
        }
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.journal.lock().clear();
        Ok(())
    }
}

/// Handle returned by [`InMemoryAccounts`].
pub struct JournalizedAccountWrap {
    address: Address,
    account: SharedAccount,
    journal: Arc<Mutex<Journal>>,
}

impl JournalizedAccountWrap {
    fn record(&self, entry: JournalEntry) {
        self.journal.lock().push(entry);
    }
}

impl JournalizedAccount for JournalizedAccountWrap {
    fn address(&self) -> &Address {
        &self.address
    }

    fn nonce(&self) -> u64 {
        self.account.read().nonce
    }

    fn balance(&self) -> BigUint {
        self.account.read().balance.clone()
    }

    fn code(&self) -> Vec<u8> {
        self.account.read().code.clone()
    }

    fn registration_data(&self) -> Vec<RegistrationData> {
        self.account.read().registration_data.clone()
    }

    fn has_code(&self) -> bool {
        self.account.read().is_contract()
    }

    fn set_nonce_with_journal(&self, nonce: u64) -> Result<()> {
        let mut account = self.account.write();
        self.record(JournalEntry::Nonce {
            address: self.address.clone(),
            previous: account.nonce,
        });
        account.nonce = nonce;
        Ok(())
    }

    fn set_balance_with_journal(&self, balance: BigUint) -> Result<()> {
        let mut account = self.account.write();
        let previous = std::mem::replace(&mut account.balance, balance);
        self.record(JournalEntry::Balance {
            address: self.address.clone(),
            previous,
        });
        Ok(())
    }

    fn set_code_with_journal(&self, code: Vec<u8>) -> Result<()> {
        let mut account = self.account.write();
        let previous = std::mem::replace(&mut account.code, code);
        self.record(JournalEntry::Code {
            address: self.address.clone(),
            previous,
        });
        Ok(())
    }

    fn append_registration_data_with_journal(&self, data: RegistrationData) -> Result<()> {
        let mut account = self.account.write();
        account.registration_data.push(data);
        self.record(JournalEntry::RegistrationAppended {
            address: self.address.clone(),
        });
        Ok(())
    }
}
