//! Expense and payment records, the two event streams the ledger reconciles.
//!
//! An [`ExpenseRecord`] is money a member paid on behalf of the whole group;
//! a [`PaymentRecord`] is a completed out-of-band transfer between two members
//! settling part of a debt. Both are immutable once used in a computation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MemberId, MoneyCents, ResultLedger};

/// An expense paid by one member on behalf of the group.
///
/// The amount is split equally across the current roster when balances are
/// computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub amount: MoneyCents,
    pub payer: MemberId,
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
}

impl ExpenseRecord {
    /// Creates a new expense. The amount must be non-negative.
    pub fn new(
        amount: MoneyCents,
        payer: MemberId,
        date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> ResultLedger<Self> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(
                "expense amount must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            payer,
            date,
            category: category.into(),
            description: description.into(),
        })
    }
}

/// A completed direct transfer from `payer` to `receiver`.
///
/// Applying it shrinks the payer's debt and the receiver's credit by the same
/// amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub amount: MoneyCents,
    pub payer: MemberId,
    pub receiver: MemberId,
    pub date: NaiveDate,
    pub description: String,
    pub method: String,
}

impl PaymentRecord {
    /// Creates a new payment. The amount must be positive and the payer must
    /// differ from the receiver.
    pub fn new(
        amount: MoneyCents,
        payer: MemberId,
        receiver: MemberId,
        date: NaiveDate,
        description: impl Into<String>,
        method: impl Into<String>,
    ) -> ResultLedger<Self> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "payment amount must be > 0".to_string(),
            ));
        }
        if payer == receiver {
            return Err(LedgerError::InvalidAmount(
                "payer and receiver must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            payer,
            receiver,
            date,
            description: description.into(),
            method: method.into(),
        })
    }
}
