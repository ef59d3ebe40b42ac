//! Balance calculation: equal-split cost model plus completed payments.
//!
//! Each member's raw balance is what they paid minus their per-capita share of
//! the group total. Completed payments are then folded in: a payment shrinks
//! the payer's debt and the receiver's credit by the same amount. Both steps
//! are plain additions, so the application order of payments cannot change the
//! final vector.
//!
//! Amounts are integer cents, which makes the zero-sum invariant exact: the
//! per-capita split distributes the division remainder one cent at a time in
//! ascending member-id order instead of rounding.

use serde::{Deserialize, Serialize};

use crate::{
    ExpenseRecord, LedgerError, Member, MemberId, MoneyCents, PaymentRecord, ResultLedger,
    aggregate::{self, ContributionSummary},
};

/// Net position of one member at the end of a computation.
///
/// Positive = creditor (is owed money), negative = debtor (owes money).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub member: MemberId,
    pub amount: MoneyCents,
}

impl Balance {
    #[must_use]
    pub const fn new(member: MemberId, amount: MoneyCents) -> Self {
        Self { member, amount }
    }

    /// `true` when the member is owed money.
    #[must_use]
    pub const fn is_creditor(&self) -> bool {
        self.amount.is_positive()
    }
}

/// How one member's final balance was derived.
///
/// Returned instead of logging intermediate values from inside the algorithm,
/// so callers can render or store the explanation as they see fit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTraceEntry {
    pub member: MemberId,
    pub total_paid: MoneyCents,
    /// This member's share of the group total, including the extra cent when
    /// the split does not divide evenly.
    pub share: MoneyCents,
    /// `total_paid - share`, before payments.
    pub raw_balance: MoneyCents,
    /// Net effect of completed payments (paid out minus received).
    pub payment_adjustment: MoneyCents,
    pub final_balance: MoneyCents,
}

/// Structured explanation of a balance computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTrace {
    pub total_expenses: MoneyCents,
    pub member_count: usize,
    pub per_capita_cost: MoneyCents,
    /// Cents that could not be divided evenly; carried by the first members in
    /// ascending id order.
    pub remainder_cents: i64,
    pub members: Vec<MemberTraceEntry>,
}

/// Result of a balance computation over one group snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// One balance per roster member, in ascending member-id order.
    pub balances: Vec<Balance>,
    pub total_expenses: MoneyCents,
    /// Base per-capita cost (`total / member_count`, floor).
    pub per_capita_cost: MoneyCents,
    pub trace: BalanceTrace,
}

/// Computes the balance vector for one group snapshot.
///
/// `perCapita = total / members` with the division remainder distributed one
/// cent each to the first members in ascending id order, so
/// `sum(balances) == 0` holds exactly. Members with no recorded expenses still
/// receive a negative per-capita share; that is the equal-split semantics, not
/// an oversight.
///
/// Errors:
/// - empty roster: [`LedgerError::InvalidGroupState`]
/// - expense payer or payment party not on the roster:
///   [`LedgerError::KeyNotFound`]
pub fn compute_balances(
    roster: &[Member],
    expenses: &[ExpenseRecord],
    payments: &[PaymentRecord],
) -> ResultLedger<BalanceSheet> {
    let summary = aggregate::aggregate(roster, expenses)?;
    compute_from_summary(&summary, payments)
}

fn compute_from_summary(
    summary: &ContributionSummary,
    payments: &[PaymentRecord],
) -> ResultLedger<BalanceSheet> {
    let member_count = summary.member_count();
    let total_expenses = summary.total_expenses();
    let (per_capita_cost, remainder_cents) = total_expenses
        .split_even(member_count)
        .ok_or_else(|| LedgerError::InvalidGroupState("group has no members".to_string()))?;

    tracing::debug!(
        %total_expenses,
        member_count,
        %per_capita_cost,
        remainder_cents,
        "computing balances"
    );

    // Contributions iterate in ascending member-id order, which decides who
    // carries the remainder cents.
    let mut entries: Vec<MemberTraceEntry> = summary
        .iter()
        .enumerate()
        .map(|(index, contribution)| {
            let extra = i64::from((index as i64) < remainder_cents);
            let share = per_capita_cost + MoneyCents::new(extra);
            let raw_balance = contribution.total_paid - share;
            MemberTraceEntry {
                member: contribution.member,
                total_paid: contribution.total_paid,
                share,
                raw_balance,
                payment_adjustment: MoneyCents::ZERO,
                final_balance: raw_balance,
            }
        })
        .collect();

    for payment in payments {
        apply_payment(&mut entries, payment)?;
    }

    let balances: Vec<Balance> = entries
        .iter()
        .map(|entry| Balance::new(entry.member, entry.final_balance))
        .collect();

    debug_assert!(balances.iter().map(|b| b.amount).sum::<MoneyCents>().is_zero());

    Ok(BalanceSheet {
        balances,
        total_expenses,
        per_capita_cost,
        trace: BalanceTrace {
            total_expenses,
            member_count,
            per_capita_cost,
            remainder_cents,
            members: entries,
        },
    })
}

fn apply_payment(entries: &mut [MemberTraceEntry], payment: &PaymentRecord) -> ResultLedger<()> {
    let payer_index = position_of(entries, payment.payer)
        .ok_or_else(|| LedgerError::KeyNotFound(format!("payment payer {}", payment.payer)))?;
    let receiver_index = position_of(entries, payment.receiver)
        .ok_or_else(|| LedgerError::KeyNotFound(format!("payment receiver {}", payment.receiver)))?;

    // Paying back a debt moves the payer toward zero from below and the
    // receiver toward zero from above.
    entries[payer_index].payment_adjustment += payment.amount;
    entries[payer_index].final_balance += payment.amount;
    entries[receiver_index].payment_adjustment -= payment.amount;
    entries[receiver_index].final_balance -= payment.amount;
    Ok(())
}

fn position_of(entries: &[MemberTraceEntry], member: MemberId) -> Option<usize> {
    entries.iter().position(|entry| entry.member == member)
}
