// Transaction processing: the per-transaction state machine and the block
// driver that applies a batch of transactions over the journal.

pub mod block;
pub mod kind;
pub mod sc_handler;
pub mod transaction;

pub use block::*;
pub use kind::*;
pub use sc_handler::*;
pub use transaction::*;
