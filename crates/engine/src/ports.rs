//! Collaborator ports and the lenient balance-payload boundary.
//!
//! The engine never fetches anything itself: roster, expenses and payments
//! come from a [`GroupDirectory`] implemented by the surrounding system. The
//! three reads are independent and may be served concurrently, but one
//! computation must see a single consistent snapshot; implementors must not
//! interleave mutations into one read-compute pass.

use serde_json::Value;
use uuid::Uuid;

use crate::{
    Balance, ExpenseRecord, LedgerError, Member, MemberId, MoneyCents, PaymentRecord, ResultLedger,
    members::GroupId,
};

/// Read access to the persisted inputs of a computation, scoped to one group.
pub trait GroupDirectory {
    fn list_members(&self, group: GroupId) -> ResultLedger<Vec<Member>>;
    fn list_expenses(&self, group: GroupId) -> ResultLedger<Vec<ExpenseRecord>>;
    fn list_payments(&self, group: GroupId) -> ResultLedger<Vec<PaymentRecord>>;
}

impl Balance {
    /// Builds a balance from an untrusted payload entry.
    ///
    /// Accepted amount encodings:
    /// - JSON integer: minor units (cents), the engine's own wire format
    /// - JSON string: decimal currency units (`"30"`, `"29.99"`, `"-0,50"`)
    ///
    /// Anything else, a missing member id or a missing amount is rejected with
    /// [`LedgerError::MalformedBalancePayload`]. Binary floating point is
    /// rejected on purpose: it is how the legacy drift crept in.
    pub fn from_payload(member_id: Option<Uuid>, amount: Option<&Value>) -> ResultLedger<Balance> {
        let member = member_id
            .map(MemberId)
            .ok_or_else(|| {
                LedgerError::MalformedBalancePayload("missing member id".to_string())
            })?;
        let amount = amount.ok_or_else(|| {
            LedgerError::MalformedBalancePayload(format!("missing balance for member {member}"))
        })?;

        let amount = match amount {
            Value::Number(number) => number.as_i64().map(MoneyCents::new).ok_or_else(|| {
                LedgerError::MalformedBalancePayload(format!(
                    "non-integer balance for member {member}: {number}"
                ))
            })?,
            Value::String(text) => text.parse::<MoneyCents>().map_err(|_| {
                LedgerError::MalformedBalancePayload(format!(
                    "unparsable balance for member {member}: {text:?}"
                ))
            })?,
            other => {
                return Err(LedgerError::MalformedBalancePayload(format!(
                    "non-numeric balance for member {member}: {other}"
                )));
            }
        };

        Ok(Balance::new(member, amount))
    }
}
