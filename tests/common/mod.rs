//! Test doubles shared by the integration tests
#![allow(dead_code)]

use accountchain::error::{ChainError, Result};
use accountchain::hashing::Sha256Hasher;
use accountchain::marshal::BincodeMarshalizer;
use accountchain::process::TxProcessor;
use accountchain::state::{
    Account, AccountHandle, AccountsAdapter, Address, AddressConverter, JournalizedAccount,
    RegistrationData,
};
use num_bigint::BigUint;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type GetAccountFn = Box<dyn Fn(&Address) -> Result<AccountHandle> + Send + Sync>;

/// Account store whose lookup behavior is supplied by the test.
#[derive(Default)]
pub struct AccountsStub {
    get_journalized_account_called: Mutex<Option<GetAccountFn>>,
}

impl AccountsStub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_get(&self, f: impl Fn(&Address) -> Result<AccountHandle> + Send + Sync + 'static) {
        *self.get_journalized_account_called.lock() = Some(Box::new(f));
    }

    /// Serve the given mocks by address, fail for anything else.
    pub fn serve(&self, accounts: Vec<Arc<JournalizedAccountWrapMock>>) {
        self.on_get(move |address| {
            accounts
                .iter()
                .find(|a| a.address() == address)
                .map(|a| a.clone() as AccountHandle)
                .ok_or_else(|| ChainError::StorageError("failure".to_string()))
        });
    }
}

impl AccountsAdapter for AccountsStub {
    fn get_journalized_account(&self, address: &Address) -> Result<AccountHandle> {
        match &*self.get_journalized_account_called.lock() {
            Some(f) => f(address),
            None => Err(ChainError::StorageError("no lookup configured".to_string())),
        }
    }

    fn journal_len(&self) -> usize {
        0
    }

    fn revert_to_snapshot(&self, _snapshot: usize) -> Result<()> {
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        Ok(())
    }
}

/// Account double with switchable write failures and a record of appends.
pub struct JournalizedAccountWrapMock {
    address: Address,
    pub account: Mutex<Account>,
    pub fail_balance: AtomicBool,
    pub fail_nonce: AtomicBool,
    pub fail_append: AtomicBool,
}

impl JournalizedAccountWrapMock {
    pub fn new(address: &[u8]) -> Arc<Self> {
        let address = Address::from_bytes(address.to_vec());
        Arc::new(JournalizedAccountWrapMock {
            account: Mutex::new(Account::new(address.clone())),
            address,
            fail_balance: AtomicBool::new(false),
            fail_nonce: AtomicBool::new(false),
            fail_append: AtomicBool::new(false),
        })
    }

    pub fn snapshot(&self) -> Account {
        self.account.lock().clone()
    }

    fn check(flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(ChainError::JournalError("failure".to_string()));
        }
        Ok(())
    }
}

impl JournalizedAccount for JournalizedAccountWrapMock {
    fn address(&self) -> &Address {
        &self.address
    }

    fn nonce(&self) -> u64 {
        self.account.lock().nonce
    }

    fn balance(&self) -> BigUint {
        self.account.lock().balance.clone()
    }

    fn code(&self) -> Vec<u8> {
        self.account.lock().code.clone()
    }

    fn registration_data(&self) -> Vec<RegistrationData> {
        self.account.lock().registration_data.clone()
    }

    fn set_nonce_with_journal(&self, nonce: u64) -> Result<()> {
        Self::check(&self.fail_nonce)?;
        self.account.lock().nonce = nonce;
        Ok(())
    }

    fn set_balance_with_journal(&self, balance: BigUint) -> Result<()> {
        Self::check(&self.fail_balance)?;
        self.account.lock().balance = balance;
        Ok(())
    }

    fn set_code_with_journal(&self, code: Vec<u8>) -> Result<()> {
        self.account.lock().code = code;
        Ok(())
    }

    fn append_registration_data_with_journal(&self, data: RegistrationData) -> Result<()> {
        Self::check(&self.fail_append)?;
        self.account.lock().registration_data.push(data);
        Ok(())
    }
}

/// Converter that wraps the bytes untouched unless told to fail.
#[derive(Default)]
pub struct AddressConverterMock {
    pub fail: AtomicBool,
}

impl AddressConverter for AddressConverterMock {
    fn create_address_from_bytes(&self, bytes: &[u8]) -> Result<Address> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ChainError::InvalidAddress("failure".to_string()));
        }
        Ok(Address::from_bytes(bytes.to_vec()))
    }

    fn address_len(&self) -> usize {
        0
    }
}

pub fn new_processor(
    accounts: Arc<dyn AccountsAdapter>,
    converter: Arc<AddressConverterMock>,
) -> TxProcessor {
    TxProcessor::builder()
        .accounts(accounts)
        .hasher(Arc::new(Sha256Hasher))
        .address_converter(converter)
        .marshalizer(Arc::new(BincodeMarshalizer::default()))
        .build()
        .expect("all dependencies present")
}
