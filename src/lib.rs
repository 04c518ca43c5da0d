//! AccountChain - deterministic transaction processing for an account-based ledger
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Processing
//! - [`process`] - Transaction processor, contract dispatch hook, block driver
//! - [`transaction`] - Transaction type
//!
//! ## State
//! - [`state`] - Addresses, accounts, registration records, journaled account store
//!
//! ## Codecs & Hashing
//! - [`marshal`] - Serialization codecs (bincode, JSON)
//! - [`hashing`] - Hash functions (SHA-256)
//! - [`encoding`] - Serde helpers for bytes and amounts
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Processing
// ============================================================================
pub mod process;
pub mod transaction;

// ============================================================================
// State Management
// ============================================================================
pub mod state;

// ============================================================================
// Codecs & Hashing
// ============================================================================
pub mod encoding;
pub mod hashing;
pub mod marshal;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
