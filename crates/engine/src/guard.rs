//! Consistency guard for balance vectors and resolved settlements.
//!
//! Freshly computed balances sum to zero exactly, so the guard is a no-op for
//! them. Its real job is the [`crate::simplify`] entry point, where balances
//! arrive from outside (an API payload, a cached client state) and may be
//! malformed or stale.

use crate::{Balance, LedgerError, MoneyCents, ResultLedger, SettlementTransaction};

/// Guard band for externally supplied balances, in cents.
///
/// The legacy data was produced with binary floating point and a 0.01
/// tolerance; one cent of slack keeps those vectors acceptable while the
/// engine itself works in exact integer cents.
pub const ZERO_SUM_TOLERANCE: MoneyCents = MoneyCents::new(1);

/// Validates the zero-sum invariant over a balance vector.
///
/// Fails with [`LedgerError::UnbalancedLedger`] carrying the computed sum when
/// `|sum| > ZERO_SUM_TOLERANCE`. Must run before resolving balances that were
/// not freshly computed by this engine.
pub fn validate_balances(balances: &[Balance]) -> ResultLedger<()> {
    let sum: MoneyCents = balances.iter().map(|balance| balance.amount).sum();
    if sum.abs() > ZERO_SUM_TOLERANCE {
        tracing::warn!(%sum, "balance vector is not zero-sum");
        return Err(LedgerError::UnbalancedLedger { sum });
    }
    Ok(())
}

/// Post-condition check: applying every transaction must drive every balance
/// inside the guard band.
///
/// Recomputation is linear in transactions plus members; tests run it
/// unconditionally, production callers may skip it.
pub fn validate_settlement(
    balances: &[Balance],
    transactions: &[SettlementTransaction],
) -> ResultLedger<()> {
    let mut remaining: Vec<Balance> = balances.to_vec();

    for transaction in transactions {
        let from = remaining
            .iter()
            .position(|balance| balance.member == transaction.from)
            .ok_or_else(|| {
                LedgerError::KeyNotFound(format!("settlement debtor {}", transaction.from))
            })?;
        let to = remaining
            .iter()
            .position(|balance| balance.member == transaction.to)
            .ok_or_else(|| {
                LedgerError::KeyNotFound(format!("settlement creditor {}", transaction.to))
            })?;
        remaining[from].amount += transaction.amount;
        remaining[to].amount -= transaction.amount;
    }

    // Every position must end inside the band; a zero vector sum is not
    // enough since a +x/-x pair could survive.
    let residual: MoneyCents = remaining
        .iter()
        .map(|balance| balance.amount.abs())
        .filter(|amount| *amount > ZERO_SUM_TOLERANCE)
        .sum();
    if !residual.is_zero() {
        return Err(LedgerError::UnbalancedLedger { sum: residual });
    }
    Ok(())
}
