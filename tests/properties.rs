//! Property tests for balance movement and transaction validation

use accountchain::error::ProcessError;
use accountchain::hashing::Sha256Hasher;
use accountchain::marshal::BincodeMarshalizer;
use accountchain::process::TxProcessor;
use accountchain::state::{
    Account, AccountsAdapter, Address, InMemoryAccounts, JournalizedAccount, PlainAddressConverter,
};
use accountchain::transaction::Transaction;
use num_bigint::BigUint;
use proptest::prelude::*;
use std::sync::Arc;

fn addr(s: &str) -> Address {
    Address::from_bytes(s.as_bytes().to_vec())
}

fn processor(store: Arc<InMemoryAccounts>) -> TxProcessor {
    TxProcessor::builder()
        .accounts(store)
        .hasher(Arc::new(Sha256Hasher))
        .address_converter(Arc::new(PlainAddressConverter::new(0)))
        .marshalizer(Arc::new(BincodeMarshalizer::default()))
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn move_balances_conserves_total(src in 0u64..1_000_000, dst in 0u64..1_000_000, value in 0u64..1_000_000) {
        let store = InMemoryAccounts::new();
        store.seed(Account::new(addr("A")).with_balance(src));
        store.seed(Account::new(addr("B")).with_balance(dst));
        let a = store.get_journalized_account(&addr("A")).unwrap();
        let b = store.get_journalized_account(&addr("B")).unwrap();

        let result = TxProcessor::move_balances(a.as_ref(), b.as_ref(), &BigUint::from(value));
        prop_assert_eq!(a.balance() + b.balance(), BigUint::from(src) + BigUint::from(dst));
        if value <= src {
            prop_assert!(result.is_ok());
            prop_assert_eq!(a.balance(), BigUint::from(src - value));
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(a.balance(), BigUint::from(src));
        }
    }

    #[test]
    fn nonce_mismatch_wins_over_funds(account_nonce in 0u64..1000, tx_nonce in 0u64..1000, balance in 0u64..1000, value in 0u64..1000) {
        let store = InMemoryAccounts::new();
        store.seed(Account::new(addr("A")).with_nonce(account_nonce).with_balance(balance));
        let a = store.get_journalized_account(&addr("A")).unwrap();

        let result = TxProcessor::check_tx_values(a.as_ref(), &BigUint::from(value), tx_nonce);
        match result {
            Ok(()) => prop_assert!(tx_nonce == account_nonce && value <= balance),
            Err(ProcessError::HigherNonceInTransaction { .. }) => prop_assert!(tx_nonce > account_nonce),
            Err(ProcessError::LowerNonceInTransaction { .. }) => prop_assert!(tx_nonce < account_nonce),
            Err(ProcessError::InsufficientFunds { .. }) => {
                prop_assert_eq!(tx_nonce, account_nonce);
                prop_assert!(value > balance);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn rejected_transfer_leaves_store_unchanged(nonce in 0u64..8, balance in 0u64..100, tx_nonce in 0u64..8, value in 0u64..200) {
        let store = Arc::new(InMemoryAccounts::new());
        store.seed(Account::new(addr("SRC")).with_nonce(nonce).with_balance(balance));
        store.seed(Account::new(addr("DEST")).with_balance(7u32));
        let execs = processor(store.clone());
        let before = store.accounts();
        let journal_before = store.journal_len();

        let tx = Transaction::new(tx_nonce, "SRC", "DEST", value);
        match execs.process_transaction(&tx, 0) {
            Ok(()) => {
                let src = store.account(&addr("SRC")).unwrap();
                prop_assert_eq!(src.nonce, nonce + 1);
                prop_assert_eq!(src.balance, BigUint::from(balance - value));
            }
            Err(err) => {
                prop_assert!(err.is_validation());
                prop_assert_eq!(store.accounts(), before);
                prop_assert_eq!(store.journal_len(), journal_before);
            }
        }
    }
}
