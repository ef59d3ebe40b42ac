//! Ledger aggregation: raw expense records folded into per-member totals.
//!
//! This is the first stage of the balance pipeline. It only sums what each
//! member paid; the equal-split accounting happens in [`crate::balance`].

use std::collections::BTreeMap;

use crate::{ExpenseRecord, LedgerError, Member, MemberId, MoneyCents, ResultLedger};

/// What one member contributed to the group ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberContribution {
    pub member: MemberId,
    /// Total amount this member paid in expenses.
    pub total_paid: MoneyCents,
    pub expense_count: usize,
    /// The expenses this member paid, ordered by date (stable on ties) for
    /// audit display.
    pub expenses: Vec<ExpenseRecord>,
}

/// Per-member contribution totals for one group.
///
/// Every roster member is present, including those who paid nothing: they
/// still owe their per-capita share downstream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContributionSummary {
    // BTreeMap keyed by MemberId so iteration order is deterministic.
    per_member: BTreeMap<MemberId, MemberContribution>,
    total_expenses: MoneyCents,
}

impl ContributionSummary {
    /// Sum of all expense amounts in the group.
    #[must_use]
    pub fn total_expenses(&self) -> MoneyCents {
        self.total_expenses
    }

    /// Number of roster members covered by the summary.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.per_member.len()
    }

    #[must_use]
    pub fn contribution(&self, member: MemberId) -> Option<&MemberContribution> {
        self.per_member.get(&member)
    }

    /// Iterates contributions in ascending member-id order.
    pub fn iter(&self) -> impl Iterator<Item = &MemberContribution> {
        self.per_member.values()
    }
}

/// Folds the expense stream into per-member totals for the given roster.
///
/// Errors:
/// - empty roster: [`LedgerError::InvalidGroupState`] (the per-capita split is
///   undefined for zero members)
/// - an expense whose payer is not on the roster:
///   [`LedgerError::KeyNotFound`] (its amount would leak out of the zero-sum)
pub fn aggregate(roster: &[Member], expenses: &[ExpenseRecord]) -> ResultLedger<ContributionSummary> {
    if roster.is_empty() {
        return Err(LedgerError::InvalidGroupState(
            "group has no members".to_string(),
        ));
    }

    let mut per_member: BTreeMap<MemberId, MemberContribution> = roster
        .iter()
        .map(|member| {
            (
                member.id,
                MemberContribution {
                    member: member.id,
                    total_paid: MoneyCents::ZERO,
                    expense_count: 0,
                    expenses: Vec::new(),
                },
            )
        })
        .collect();

    let mut total_expenses = MoneyCents::ZERO;
    for expense in expenses {
        let contribution = per_member
            .get_mut(&expense.payer)
            .ok_or_else(|| LedgerError::KeyNotFound(format!("payer {}", expense.payer)))?;
        contribution.total_paid += expense.amount;
        contribution.expense_count += 1;
        contribution.expenses.push(expense.clone());
        total_expenses += expense.amount;
    }

    for contribution in per_member.values_mut() {
        contribution.expenses.sort_by_key(|expense| expense.date);
    }

    Ok(ContributionSummary {
        per_member,
        total_expenses,
    })
}
