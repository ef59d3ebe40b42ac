use chrono::NaiveDate;
use proptest::prelude::*;
use uuid::Uuid;

use engine::{
    ExpenseRecord, Member, MemberId, MoneyCents, PaymentRecord, SettlementStrategy, balance, guard,
    settle,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn roster(member_count: usize) -> Vec<Member> {
    (0..member_count)
        .map(|index| Member {
            id: MemberId(Uuid::from_u128(index as u128 + 1)),
            name: format!("member-{index}"),
            email: format!("member-{index}@example.com"),
        })
        .collect()
}

fn build_inputs(
    member_count: usize,
    expense_amounts: &[i64],
    payer_indexes: &[usize],
    payments_raw: &[(i64, usize, usize)],
) -> (Vec<Member>, Vec<ExpenseRecord>, Vec<PaymentRecord>) {
    let members = roster(member_count);

    let expenses: Vec<ExpenseRecord> = expense_amounts
        .iter()
        .zip(payer_indexes)
        .map(|(amount, payer_index)| {
            let payer = members[payer_index % member_count].id;
            ExpenseRecord::new(MoneyCents::new(*amount), payer, day(), "misc", "").unwrap()
        })
        .collect();

    let payments: Vec<PaymentRecord> = payments_raw
        .iter()
        .filter_map(|(amount, payer_index, receiver_index)| {
            let payer = members[payer_index % member_count].id;
            let receiver = members[receiver_index % member_count].id;
            if payer == receiver {
                return None;
            }
            Some(
                PaymentRecord::new(MoneyCents::new(*amount), payer, receiver, day(), "", "cash")
                    .unwrap(),
            )
        })
        .collect();

    (members, expenses, payments)
}

proptest! {
    /// Zero-sum invariant: whatever was spent and repaid, the balance vector
    /// sums to exactly zero.
    #[test]
    fn balances_sum_to_zero(
        member_count in 1usize..=6,
        expense_amounts in prop::collection::vec(0i64..=100_000, 0..=20),
        payer_indexes in prop::collection::vec(0usize..=5, 20),
        payments_raw in prop::collection::vec((1i64..=50_000, 0usize..=5, 0usize..=5), 0..=15),
    ) {
        let (members, expenses, payments) =
            build_inputs(member_count, &expense_amounts, &payer_indexes, &payments_raw);

        let sheet = balance::compute_balances(&members, &expenses, &payments).unwrap();
        let total: i64 = sheet.balances.iter().map(|b| b.amount.cents()).sum();
        prop_assert_eq!(total, 0);
        prop_assert!(guard::validate_balances(&sheet.balances).is_ok());
    }
}

proptest! {
    /// Settlement completeness and bounds, for both strategies: applying the
    /// resolved transfers zeroes every balance, every amount is positive with
    /// distinct endpoints, and at most `non-zero members - 1` transfers are
    /// emitted.
    #[test]
    fn resolution_squares_any_computed_vector(
        member_count in 1usize..=6,
        expense_amounts in prop::collection::vec(0i64..=100_000, 0..=20),
        payer_indexes in prop::collection::vec(0usize..=5, 20),
        payments_raw in prop::collection::vec((1i64..=50_000, 0usize..=5, 0usize..=5), 0..=15),
        use_two_pointer in any::<bool>(),
    ) {
        let (members, expenses, payments) =
            build_inputs(member_count, &expense_amounts, &payer_indexes, &payments_raw);
        let strategy = if use_two_pointer {
            SettlementStrategy::TwoPointer
        } else {
            SettlementStrategy::MaxPair
        };

        let sheet = balance::compute_balances(&members, &expenses, &payments).unwrap();
        let transactions = settle::resolve(&sheet.balances, strategy).unwrap();

        let non_zero = sheet
            .balances
            .iter()
            .filter(|b| !b.amount.is_zero())
            .count();
        prop_assert!(transactions.len() <= non_zero.saturating_sub(1));
        for tx in &transactions {
            prop_assert!(tx.amount.is_positive());
            prop_assert!(tx.from != tx.to);
        }
        prop_assert!(guard::validate_settlement(&sheet.balances, &transactions).is_ok());
    }
}

proptest! {
    /// Payment-order independence: any permutation of the payment stream
    /// produces the same final vector.
    #[test]
    fn payment_order_is_irrelevant(
        member_count in 2usize..=6,
        expense_amounts in prop::collection::vec(0i64..=100_000, 0..=10),
        payer_indexes in prop::collection::vec(0usize..=5, 10),
        payments_raw in prop::collection::vec((1i64..=50_000, 0usize..=5, 0usize..=5), 2..=12),
        rotation in 0usize..=11,
    ) {
        let (members, expenses, payments) =
            build_inputs(member_count, &expense_amounts, &payer_indexes, &payments_raw);

        let baseline = balance::compute_balances(&members, &expenses, &payments).unwrap();

        let mut reordered = payments.clone();
        reordered.reverse();
        if !reordered.is_empty() {
            let len = reordered.len();
            reordered.rotate_left(rotation % len);
        }
        let shuffled = balance::compute_balances(&members, &expenses, &reordered).unwrap();

        prop_assert_eq!(baseline.balances, shuffled.balances);
    }
}
