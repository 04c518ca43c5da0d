use crate::state::{Address, JournalizedAccount, RegistrationPolicy};

/// The single effect a transaction will have, decided from the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Receiver carries code; execution is delegated to the contract handler
    ContractCall,
    /// Receiver is a reserved registration address
    Registration,
    MoveBalance,
}

impl TransactionKind {
    /// Code takes precedence over the registration table, which takes
    /// precedence over a plain transfer.
    pub fn classify(
        receiver_address: &Address,
        receiver: &dyn JournalizedAccount,
        registration: &RegistrationPolicy,
    ) -> Self {
        if receiver.has_code() {
            TransactionKind::ContractCall
        } else if registration.is_registration_address(receiver_address) {
            TransactionKind::Registration
        } else {
            TransactionKind::MoveBalance
        }
    }

    /// Whether the processor advances the sender nonce for this kind.
    pub fn advances_nonce(self) -> bool {
        !matches!(self, TransactionKind::ContractCall)
    }
}
