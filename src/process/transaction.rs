//! Transaction processor
//!
//! Applies exactly one transaction to the account store. Every check runs
//! before the first write, so a rejected transaction leaves the store
//! untouched. Writes that fail midway are left for the journal to undo; the
//! processor never compensates on its own.
//!
//! Calls touching the same accounts must not run concurrently: the
//! validate-then-mutate sequence assumes exclusive access for its duration.

use crate::error::{AccountSide, ChainError, ProcessError};
use crate::hashing::Hasher;
use crate::marshal::Marshalizer;
use crate::process::kind::TransactionKind;
use crate::process::sc_handler::{ContractHandler, ContractHandlerState};
use crate::state::{
    AccountHandle, AccountsAdapter, Address, AddressConverter, JournalizedAccount,
    RegistrationPolicy,
};
use crate::transaction::Transaction;
use num_bigint::BigUint;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct TxProcessor {
    accounts: Arc<dyn AccountsAdapter>,
    hasher: Arc<dyn Hasher>,
    address_converter: Arc<dyn AddressConverter>,
    marshalizer: Arc<dyn Marshalizer>,
    registration: RegistrationPolicy,
    sc_handler: RwLock<ContractHandlerState>,
}

/// Collects the processor's dependencies; `build` reports the first missing one.
#[derive(Default)]
pub struct TxProcessorBuilder {
    accounts: Option<Arc<dyn AccountsAdapter>>,
    hasher: Option<Arc<dyn Hasher>>,
    address_converter: Option<Arc<dyn AddressConverter>>,
    marshalizer: Option<Arc<dyn Marshalizer>>,
    registration: RegistrationPolicy,
}

impl TxProcessorBuilder {
    pub fn accounts(mut self, accounts: Arc<dyn AccountsAdapter>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn hasher(mut self, hasher: Arc<dyn Hasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn address_converter(mut self, address_converter: Arc<dyn AddressConverter>) -> Self {
        self.address_converter = Some(address_converter);
        self
    }

    pub fn marshalizer(mut self, marshalizer: Arc<dyn Marshalizer>) -> Self {
        self.marshalizer = Some(marshalizer);
        self
    }

    pub fn registration_policy(mut self, registration: RegistrationPolicy) -> Self {
        self.registration = registration;
        self
    }

    pub fn build(self) -> Result<TxProcessor, ProcessError> {
        let accounts = self.accounts.ok_or(ProcessError::NilAccountsAdapter)?;
        let hasher = self.hasher.ok_or(ProcessError::NilHasher)?;
        let address_converter = self
            .address_converter
            .ok_or(ProcessError::NilAddressConverter)?;
        let marshalizer = self.marshalizer.ok_or(ProcessError::NilMarshalizer)?;

        Ok(TxProcessor {
            accounts,
            hasher,
            address_converter,
            marshalizer,
            registration: self.registration,
            sc_handler: RwLock::new(ContractHandlerState::Unset),
        })
    }
}

impl TxProcessor {
    pub fn builder() -> TxProcessorBuilder {
        TxProcessorBuilder::default()
    }

    pub fn new(
        accounts: Option<Arc<dyn AccountsAdapter>>,
        hasher: Option<Arc<dyn Hasher>>,
        address_converter: Option<Arc<dyn AddressConverter>>,
        marshalizer: Option<Arc<dyn Marshalizer>>,
    ) -> Result<Self, ProcessError> {
        TxProcessorBuilder {
            accounts,
            hasher,
            address_converter,
            marshalizer,
            registration: RegistrationPolicy::default(),
        }
        .build()
    }

    pub fn accounts(&self) -> &Arc<dyn AccountsAdapter> {
        &self.accounts
    }

    pub fn hasher(&self) -> &Arc<dyn Hasher> {
        &self.hasher
    }

    pub fn marshalizer(&self) -> &Arc<dyn Marshalizer> {
        &self.marshalizer
    }

    pub fn registration_policy(&self) -> &RegistrationPolicy {
        &self.registration
    }

    /// Install the contract handler. The last call wins.
    pub fn set_contract_handler(&self, handler: impl ContractHandler + 'static) {
        *self.sc_handler.write() = ContractHandlerState::Configured(Arc::new(handler));
    }

    pub fn contract_handler(&self) -> ContractHandlerState {
        self.sc_handler.read().clone()
    }

    /// Hash of the marshalled transaction.
    pub fn transaction_hash(&self, tx: &Transaction) -> Result<Vec<u8>, ChainError> {
        let encoded = self.marshalizer.marshal_transaction(tx)?;
        Ok(self.hasher.compute(&encoded))
    }

    fn transaction_hash_hex(&self, tx: &Transaction) -> String {
        match self.transaction_hash(tx) {
            Ok(hash) => hex::encode(hash),
            Err(_) => "<unencodable>".to_string(),
        }
    }

    /// Apply `tx` to the account store at `round_index`.
    pub fn process_transaction<'a>(
        &self,
        tx: impl Into<Option<&'a Transaction>>,
        round_index: i32,
    ) -> Result<(), ProcessError> {
        let tx = tx.into().ok_or(ProcessError::NilTransaction)?;

        match self.apply(tx, round_index) {
            Ok(kind) => {
                debug!(
                    tx = %self.transaction_hash_hex(tx),
                    ?kind,
                    round = round_index,
                    "transaction applied"
                );
                Ok(())
            }
            Err(err) => {
                debug!(
                    tx = %self.transaction_hash_hex(tx),
                    round = round_index,
                    error = %err,
                    "transaction rejected"
                );
                Err(err)
            }
        }
    }

    fn apply(&self, tx: &Transaction, round_index: i32) -> Result<TransactionKind, ProcessError> {
        let (adr_src, adr_dst) = self.resolve_addresses(tx)?;
        let (acnt_src, acnt_dst) = self.load_accounts(&adr_src, &adr_dst)?;

        Self::check_tx_values(acnt_src.as_ref(), &tx.value, tx.nonce)?;

        let kind = TransactionKind::classify(&adr_dst, acnt_dst.as_ref(), &self.registration);
        trace!(?kind, sender = %adr_src, receiver = %adr_dst, "classified transaction");

        match kind {
            // the handler owns the nonce and balance effects of a contract call
            TransactionKind::ContractCall => self.call_contract_handler(tx)?,
            TransactionKind::Registration => {
                self.register_node(tx, &adr_src, acnt_dst.as_ref(), round_index)?
            }
            TransactionKind::MoveBalance => {
                Self::move_balances(acnt_src.as_ref(), acnt_dst.as_ref(), &tx.value)?
            }
        }

        if kind.advances_nonce() {
            Self::increase_nonce(acnt_src.as_ref())?;
        }
        Ok(kind)
    }

    /// Convert the transaction's raw addresses into (sender, receiver).
    pub fn resolve_addresses(&self, tx: &Transaction) -> Result<(Address, Address), ProcessError> {
        let adr_src = self
            .address_converter
            .create_address_from_bytes(&tx.snd_addr)
            .map_err(ProcessError::AddressConversion)?;
        let adr_dst = self
            .address_converter
            .create_address_from_bytes(&tx.rcv_addr)
            .map_err(ProcessError::AddressConversion)?;
        Ok((adr_src, adr_dst))
    }

    /// Fetch (sender, receiver) accounts. Both handles share the backing
    /// account when the addresses are equal.
    pub fn load_accounts(
        &self,
        adr_src: &Address,
        adr_dst: &Address,
    ) -> Result<(AccountHandle, AccountHandle), ProcessError> {
        let acnt_src = self
            .accounts
            .get_journalized_account(adr_src)
            .map_err(|source| ProcessError::AccountLookup {
                side: AccountSide::Sender,
                source,
            })?;
        let acnt_dst = self
            .accounts
            .get_journalized_account(adr_dst)
            .map_err(|source| ProcessError::AccountLookup {
                side: AccountSide::Receiver,
                source,
            })?;
        Ok((acnt_src, acnt_dst))
    }

    /// Nonce must match exactly, then the balance must cover `value`.
    pub fn check_tx_values(
        acnt_src: &dyn JournalizedAccount,
        value: &BigUint,
        nonce: u64,
    ) -> Result<(), ProcessError> {
        let account_nonce = acnt_src.nonce();
        if nonce > account_nonce {
            return Err(ProcessError::HigherNonceInTransaction {
                account: account_nonce,
                transaction: nonce,
            });
        }
        if nonce < account_nonce {
            return Err(ProcessError::LowerNonceInTransaction {
                account: account_nonce,
                transaction: nonce,
            });
        }

        let balance = acnt_src.balance();
        if balance < *value {
            return Err(ProcessError::InsufficientFunds {
                balance: balance.to_string(),
                required: value.to_string(),
            });
        }
        Ok(())
    }

    /// Debit `value` from `acnt_src`, then credit it to `acnt_dst`.
    pub fn move_balances(
        acnt_src: &dyn JournalizedAccount,
        acnt_dst: &dyn JournalizedAccount,
        value: &BigUint,
    ) -> Result<(), ProcessError> {
        let src_balance = acnt_src.balance();
        if src_balance < *value {
            return Err(ProcessError::BalanceTransfer(ChainError::BalanceUnderflow {
                balance: src_balance.to_string(),
                amount: value.to_string(),
            }));
        }
        acnt_src
            .set_balance_with_journal(src_balance - value)
            .map_err(ProcessError::BalanceTransfer)?;

        // re-read: on a self-transfer this is the balance just written
        let dst_balance = acnt_dst.balance();
        acnt_dst
            .set_balance_with_journal(dst_balance + value)
            .map_err(ProcessError::BalanceTransfer)?;
        Ok(())
    }

    pub fn increase_nonce(acnt_src: &dyn JournalizedAccount) -> Result<(), ProcessError> {
        let nonce = acnt_src.nonce();
        let next = nonce
            .checked_add(1)
            .ok_or(ProcessError::NonceAdvance(ChainError::NonceOverflow(nonce)))?;
        acnt_src
            .set_nonce_with_journal(next)
            .map_err(ProcessError::NonceAdvance)
    }

    /// Hand the transaction to the contract handler and return its result.
    pub fn call_contract_handler(&self, tx: &Transaction) -> Result<(), ProcessError> {
        let handler = self
            .contract_handler()
            .handler()
            .cloned()
            .ok_or(ProcessError::NoVm)?;
        handler
            .execute(self.accounts.as_ref(), tx)
            .map_err(ProcessError::ContractHandler)
    }

    /// Decode the registration payload and append it to the registration account.
    pub fn register_node(
        &self,
        tx: &Transaction,
        adr_src: &Address,
        acnt_reg: &dyn JournalizedAccount,
        round_index: i32,
    ) -> Result<(), ProcessError> {
        let mut data = self
            .marshalizer
            .unmarshal_registration(&tx.data)
            .map_err(ProcessError::RegistrationDecode)?;

        if self.registration.stamp_sender_and_round {
            data.originator_public_key = adr_src.as_bytes().to_vec();
            data.round_index = round_index;
        }

        acnt_reg
            .append_registration_data_with_journal(data)
            .map_err(ProcessError::RegistrationAppend)
    }
}
