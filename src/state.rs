// Thin re-export module: account state lives in `state/` split by concern
// (addresses, account records, registration data, journal, account store).

pub mod account;
pub mod accounts;
pub mod address;
pub mod journal;
pub mod registration;

pub use account::*;
pub use accounts::*;
pub use address::*;
pub use journal::*;
pub use registration::*;
