//! The module contains the errors the ledger engine can throw.
//!
//! The interesting ones are:
//!
//! - [`InvalidGroupState`] thrown when a computation is requested for a group
//!   whose roster is empty (the per-capita split is undefined).
//! - [`UnbalancedLedger`] thrown when a balance vector does not sum to zero
//!   within the guard band. It should never occur for freshly computed
//!   balances; it guards externally supplied ones.
//! - [`MalformedBalancePayload`] thrown when an external balance entry misses
//!   the member identity or carries a non-numeric amount.
//!
//! [`InvalidGroupState`]: LedgerError::InvalidGroupState
//! [`UnbalancedLedger`]: LedgerError::UnbalancedLedger
//! [`MalformedBalancePayload`]: LedgerError::MalformedBalancePayload
use thiserror::Error;

use crate::MoneyCents;

/// Ledger engine custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid group state: {0}")]
    InvalidGroupState(String),
    #[error("Unbalanced ledger: balances sum to {sum}, expected 0")]
    UnbalancedLedger { sum: MoneyCents },
    #[error("Malformed balance payload: {0}")]
    MalformedBalancePayload(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Directory error: {0}")]
    Directory(String),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidGroupState(a), Self::InvalidGroupState(b)) => a == b,
            (Self::UnbalancedLedger { sum: a }, Self::UnbalancedLedger { sum: b }) => a == b,
            (Self::MalformedBalancePayload(a), Self::MalformedBalancePayload(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Directory(a), Self::Directory(b)) => a == b,
            _ => false,
        }
    }
}
