//! Settlement resolution: turning a balance vector into pairwise transfers.
//!
//! Two interchangeable strategies survive from the original views of the
//! ledger; [`SettlementStrategy::MaxPair`] is the canonical one and the
//! default. Both guarantee positive amounts, `from != to`, at most
//! `non-zero members - 1` transfers, and that applying every transfer zeroes
//! the vector.

use serde::{Deserialize, Serialize};

use crate::{Balance, LedgerError, MemberId, MoneyCents, ResultLedger, guard};

/// A proposed transfer from a debtor to a creditor.
///
/// Applying it moves `amount` from the debtor's balance to the creditor's:
/// `balance[from] += amount`, `balance[to] -= amount`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: MoneyCents,
}

/// Which resolution algorithm to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStrategy {
    /// Sorted two-pointer merge: debtors and creditors each sorted descending
    /// by magnitude, walked with two cursors transferring
    /// `min(debt, credit)` per step. Valid, but the transfer set depends on
    /// the two fixed orderings.
    TwoPointer,
    /// Iterative max-pair (minimum cash flow): repeatedly match the largest
    /// creditor with the largest-magnitude debtor. Terminates in at most
    /// `N - 1` transfers. Ties are broken by lowest member id.
    #[default]
    MaxPair,
}

impl SettlementStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoPointer => "two_pointer",
            Self::MaxPair => "max_pair",
        }
    }
}

impl TryFrom<&str> for SettlementStrategy {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "two_pointer" => Ok(Self::TwoPointer),
            "max_pair" => Ok(Self::MaxPair),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid settlement strategy: {other}"
            ))),
        }
    }
}

/// Working entry: member plus the cents still outstanding.
#[derive(Clone, Copy, Debug)]
struct Outstanding {
    member: MemberId,
    cents: i64,
}

/// Resolves a balance vector into settlement transfers.
///
/// Positions are matched down to exact zero; with integer cents even the
/// remainder of an uneven split is a real debt worth a transfer. A terminal
/// one-sided residual inside the guard band (see
/// [`guard::ZERO_SUM_TOLERANCE`]) is dropped as dust, which only happens for
/// externally supplied vectors that drifted by a cent. A residual above the
/// band signals [`LedgerError::UnbalancedLedger`]; that is unreachable for
/// vectors accepted by the consistency guard.
pub fn resolve(
    balances: &[Balance],
    strategy: SettlementStrategy,
) -> ResultLedger<Vec<SettlementTransaction>> {
    let mut outstanding: Vec<Outstanding> = balances
        .iter()
        .filter(|balance| !balance.amount.is_zero())
        .map(|balance| Outstanding {
            member: balance.member,
            cents: balance.amount.cents(),
        })
        .collect();

    tracing::debug!(
        strategy = strategy.as_str(),
        open_positions = outstanding.len(),
        "resolving settlement"
    );

    let transactions = match strategy {
        SettlementStrategy::TwoPointer => resolve_two_pointer(&outstanding)?,
        SettlementStrategy::MaxPair => resolve_max_pair(&mut outstanding)?,
    };

    Ok(transactions)
}

/// Sorted two-pointer merge over separate debtor and creditor lists.
fn resolve_two_pointer(outstanding: &[Outstanding]) -> ResultLedger<Vec<SettlementTransaction>> {
    let tolerance = guard::ZERO_SUM_TOLERANCE.cents();

    let mut debtors: Vec<Outstanding> = outstanding
        .iter()
        .filter(|entry| entry.cents < 0)
        .copied()
        .collect();
    let mut creditors: Vec<Outstanding> = outstanding
        .iter()
        .filter(|entry| entry.cents > 0)
        .copied()
        .collect();

    // Descending by magnitude, member id as deterministic tie-break.
    debtors.sort_by_key(|entry| (entry.cents, entry.member));
    creditors.sort_by_key(|entry| (std::cmp::Reverse(entry.cents), entry.member));

    let mut transactions = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let step = (-debtors[i].cents).min(creditors[j].cents);
        transactions.push(SettlementTransaction {
            from: debtors[i].member,
            to: creditors[j].member,
            amount: MoneyCents::new(step),
        });
        debtors[i].cents += step;
        creditors[j].cents -= step;
        if debtors[i].cents == 0 {
            i += 1;
        }
        if creditors[j].cents == 0 {
            j += 1;
        }
    }

    // Whatever survives the merge is all on one side; more than dust means
    // the input was not zero-sum.
    let leftover: i64 = debtors[i..]
        .iter()
        .chain(&creditors[j..])
        .map(|entry| entry.cents)
        .sum();
    if leftover.abs() > tolerance {
        return Err(LedgerError::UnbalancedLedger {
            sum: MoneyCents::new(leftover),
        });
    }

    Ok(transactions)
}

/// Iterative max-pair: re-scan for the extreme creditor and debtor each round.
fn resolve_max_pair(outstanding: &mut [Outstanding]) -> ResultLedger<Vec<SettlementTransaction>> {
    let tolerance = guard::ZERO_SUM_TOLERANCE.cents();
    let mut transactions = Vec::new();

    loop {
        let creditor = outstanding
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.cents > 0)
            // Largest credit first, lowest member id on ties.
            .max_by_key(|(_, entry)| (entry.cents, std::cmp::Reverse(entry.member)))
            .map(|(index, _)| index);
        let debtor = outstanding
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.cents < 0)
            .max_by_key(|(_, entry)| (-entry.cents, std::cmp::Reverse(entry.member)))
            .map(|(index, _)| index);

        match (creditor, debtor) {
            (Some(creditor), Some(debtor)) => {
                let amount = outstanding[creditor].cents.min(-outstanding[debtor].cents);
                transactions.push(SettlementTransaction {
                    from: outstanding[debtor].member,
                    to: outstanding[creditor].member,
                    amount: MoneyCents::new(amount),
                });
                outstanding[creditor].cents -= amount;
                outstanding[debtor].cents += amount;
            }
            (None, None) => break,
            // One side still has open positions the other cannot absorb.
            // They all share a sign, so their sum is the drift of the input;
            // a cent of dust is dropped, anything more is a real imbalance.
            _ => {
                let residual: i64 = outstanding.iter().map(|entry| entry.cents).sum();
                if residual.abs() > tolerance {
                    return Err(LedgerError::UnbalancedLedger {
                        sum: MoneyCents::new(residual),
                    });
                }
                break;
            }
        }
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    /// Members with ids ordered by their index, so tie-breaks are predictable.
    fn members(count: usize) -> Vec<MemberId> {
        (0..count)
            .map(|index| {
                MemberId(Uuid::from_u128(0x1000 + index as u128))
            })
            .collect()
    }

    fn balances(members: &[MemberId], cents: &[i64]) -> Vec<Balance> {
        members
            .iter()
            .zip(cents)
            .map(|(member, amount)| Balance::new(*member, MoneyCents::new(*amount)))
            .collect()
    }

    fn apply(balances: &[Balance], transactions: &[SettlementTransaction]) -> Vec<i64> {
        let mut cents: Vec<i64> = balances.iter().map(|b| b.amount.cents()).collect();
        for tx in transactions {
            let from = balances.iter().position(|b| b.member == tx.from).unwrap();
            let to = balances.iter().position(|b| b.member == tx.to).unwrap();
            cents[from] += tx.amount.cents();
            cents[to] -= tx.amount.cents();
        }
        cents
    }

    #[rstest]
    #[case::max_pair(SettlementStrategy::MaxPair)]
    #[case::two_pointer(SettlementStrategy::TwoPointer)]
    fn settles_single_creditor_against_two_debtors(#[case] strategy: SettlementStrategy) {
        let ids = members(3);
        let vector = balances(&ids, &[6000, -3000, -3000]);

        let transactions = resolve(&vector, strategy).unwrap();

        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|tx| tx.amount.is_positive()));
        assert!(transactions.iter().all(|tx| tx.from != tx.to));
        assert!(apply(&vector, &transactions).iter().all(|c| *c == 0));
    }

    #[test]
    fn max_pair_breaks_debtor_ties_by_lowest_id() {
        let ids = members(3);
        let vector = balances(&ids, &[6000, -3000, -3000]);

        let transactions = resolve(&vector, SettlementStrategy::MaxPair).unwrap();

        assert_eq!(
            transactions,
            vec![
                SettlementTransaction {
                    from: ids[1],
                    to: ids[0],
                    amount: MoneyCents::new(3000),
                },
                SettlementTransaction {
                    from: ids[2],
                    to: ids[0],
                    amount: MoneyCents::new(3000),
                },
            ]
        );
    }

    #[rstest]
    #[case::max_pair(SettlementStrategy::MaxPair)]
    #[case::two_pointer(SettlementStrategy::TwoPointer)]
    fn empty_vector_resolves_to_no_transactions(#[case] strategy: SettlementStrategy) {
        let ids = members(2);
        let vector = balances(&ids, &[0, 0]);
        assert!(resolve(&vector, strategy).unwrap().is_empty());
    }

    #[rstest]
    #[case::max_pair(SettlementStrategy::MaxPair)]
    #[case::two_pointer(SettlementStrategy::TwoPointer)]
    fn transaction_count_stays_below_member_count(#[case] strategy: SettlementStrategy) {
        let ids = members(5);
        let vector = balances(&ids, &[1000, 2500, -500, -1500, -1500]);

        let transactions = resolve(&vector, strategy).unwrap();

        assert!(transactions.len() <= 4);
        assert!(apply(&vector, &transactions).iter().all(|c| *c == 0));
    }

    #[rstest]
    #[case::max_pair(SettlementStrategy::MaxPair)]
    #[case::two_pointer(SettlementStrategy::TwoPointer)]
    fn one_cent_debts_are_real_debts(#[case] strategy: SettlementStrategy) {
        // Remainder cents from an uneven split still get settled.
        let ids = members(3);
        let vector = balances(&ids, &[2, -1, -1]);

        let transactions = resolve(&vector, strategy).unwrap();

        assert_eq!(transactions.len(), 2);
        assert!(apply(&vector, &transactions).iter().all(|c| *c == 0));
    }

    #[rstest]
    #[case::max_pair(SettlementStrategy::MaxPair)]
    #[case::two_pointer(SettlementStrategy::TwoPointer)]
    fn terminal_dust_within_the_band_is_dropped(#[case] strategy: SettlementStrategy) {
        // An externally supplied vector that drifted by one cent.
        let ids = members(2);
        let vector = balances(&ids, &[3000, -2999]);

        let transactions = resolve(&vector, strategy).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, MoneyCents::new(2999));
        let remaining = apply(&vector, &transactions);
        assert_eq!(remaining, vec![1, 0]);
    }

    #[rstest]
    #[case::max_pair(SettlementStrategy::MaxPair)]
    #[case::two_pointer(SettlementStrategy::TwoPointer)]
    fn non_zero_sum_vector_reports_the_residual(#[case] strategy: SettlementStrategy) {
        let ids = members(2);
        let vector = balances(&ids, &[5000, 0]);

        let err = resolve(&vector, strategy).unwrap_err();

        assert_eq!(
            err,
            LedgerError::UnbalancedLedger {
                sum: MoneyCents::new(5000)
            }
        );
    }

    #[test]
    fn strategy_round_trips_through_its_wire_name() {
        for strategy in [SettlementStrategy::MaxPair, SettlementStrategy::TwoPointer] {
            assert_eq!(SettlementStrategy::try_from(strategy.as_str()).unwrap(), strategy);
        }
        assert!(SettlementStrategy::try_from("newton").is_err());
    }
}
