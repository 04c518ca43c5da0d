//! Block application driver
//!
//! Applies an ordered batch of transactions through a [`TxProcessor`], using
//! the account store's journal as the commit/abort boundary: one snapshot per
//! transaction, committed once the whole batch is done.

use crate::error::{BlockError, ProcessError};
use crate::process::transaction::TxProcessor;
use crate::transaction::Transaction;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMode {
    /// Validating a received block: any rejection invalidates the whole block
    #[default]
    Strict,
    /// Building a block: rejected transactions are dropped, the rest kept
    SkipInvalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTransaction {
    pub index: usize,
    pub error: ProcessError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockReport {
    /// Indices of the transactions that were applied, in order
    pub applied: Vec<usize>,
    pub rejected: Vec<RejectedTransaction>,
}

pub struct BlockProcessor {
    processor: Arc<TxProcessor>,
    mode: BlockMode,
}

impl BlockProcessor {
    pub fn new(processor: Arc<TxProcessor>, mode: BlockMode) -> Self {
        BlockProcessor { processor, mode }
    }

    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    pub fn apply(&self, transactions: &[Transaction], round_index: i32) -> Result<BlockReport, BlockError> {
        let accounts = self.processor.accounts();
        let block_snapshot = accounts.journal_len();
        let mut report = BlockReport::default();

        for (index, tx) in transactions.iter().enumerate() {
            let snapshot = accounts.journal_len();
            match self.processor.process_transaction(tx, round_index) {
                Ok(()) => report.applied.push(index),
                Err(error) => match self.mode {
                    BlockMode::Strict => {
                        warn!(index, round = round_index, %error, "block rejected");
                        accounts
                            .revert_to_snapshot(block_snapshot)
                            .map_err(BlockError::Journal)?;
                        return Err(BlockError::Transaction {
                            index,
                            source: error,
                        });
                    }
                    BlockMode::SkipInvalid => {
                        accounts
                            .revert_to_snapshot(snapshot)
                            .map_err(BlockError::Journal)?;
                        report.rejected.push(RejectedTransaction { index, error });
                    }
                },
            }
        }

        accounts.commit().map_err(BlockError::Journal)?;
        debug!(
            round = round_index,
            applied = report.applied.len(),
            rejected = report.rejected.len(),
            "block applied"
        );
        Ok(report)
    }
}
