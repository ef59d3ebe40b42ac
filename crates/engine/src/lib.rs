//! Shared-expense group ledger engine.
//!
//! Members record expenses paid on behalf of the group and direct payments
//! made to settle debts; the engine reconciles both streams into one balance
//! vector per member and turns that vector into a minimal set of pairwise
//! settlement transactions.
//!
//! The pipeline is pure and synchronous: roster + expenses + payments go
//! through [`aggregate`], [`balance`] and [`settle`], with [`guard`] checking
//! the zero-sum invariant at the boundaries. All monetary values are integer
//! cents ([`MoneyCents`]); nothing here performs I/O beyond the
//! [`GroupDirectory`] collaborator.

pub use aggregate::{ContributionSummary, MemberContribution};
pub use balance::{Balance, BalanceSheet, BalanceTrace, MemberTraceEntry};
pub use error::LedgerError;
pub use members::{GroupId, Member, MemberId};
pub use money::MoneyCents;
pub use ports::GroupDirectory;
pub use records::{ExpenseRecord, PaymentRecord};
pub use settle::{SettlementStrategy, SettlementTransaction};

pub mod aggregate;
pub mod balance;
mod error;
pub mod guard;
mod members;
mod money;
mod ports;
mod records;
pub mod settle;

type ResultLedger<T> = Result<T, LedgerError>;

/// Facade over one [`GroupDirectory`] collaborator.
///
/// Every call fetches a fresh snapshot and runs a pure computation over it;
/// no state survives between invocations.
#[derive(Debug)]
pub struct Ledger<D> {
    directory: D,
    strategy: SettlementStrategy,
}

impl<D: GroupDirectory> Ledger<D> {
    /// Return a builder for `Ledger`.
    pub fn builder(directory: D) -> LedgerBuilder<D> {
        LedgerBuilder {
            directory,
            strategy: SettlementStrategy::default(),
        }
    }

    /// Computes the balance vector for a group.
    ///
    /// The three directory reads are independent; they only have to belong to
    /// one consistent snapshot.
    pub fn compute_balances(&self, group: GroupId) -> ResultLedger<BalanceSheet> {
        let roster = self.directory.list_members(group)?;
        let expenses = self.directory.list_expenses(group)?;
        let payments = self.directory.list_payments(group)?;
        tracing::debug!(
            %group,
            members = roster.len(),
            expenses = expenses.len(),
            payments = payments.len(),
            "loaded group snapshot"
        );
        balance::compute_balances(&roster, &expenses, &payments)
    }

    /// Computes the settlement transactions still needed to square the group.
    ///
    /// Uses the strategy configured on the builder
    /// ([`SettlementStrategy::MaxPair`] unless overridden).
    pub fn compute_pending_debts(&self, group: GroupId) -> ResultLedger<Vec<SettlementTransaction>> {
        let sheet = self.compute_balances(group)?;
        settle::resolve(&sheet.balances, self.strategy)
    }

    /// The strategy this ledger resolves with.
    #[must_use]
    pub fn strategy(&self) -> SettlementStrategy {
        self.strategy
    }
}

/// Resolves caller-supplied balances into settlement transactions.
///
/// Unlike [`Ledger::compute_pending_debts`], the input here was not computed
/// by this engine, so the consistency guard runs first: a vector whose sum
/// exceeds the guard band is rejected with [`LedgerError::UnbalancedLedger`]
/// carrying the computed sum.
pub fn simplify(
    balances: &[Balance],
    strategy: SettlementStrategy,
) -> ResultLedger<Vec<SettlementTransaction>> {
    guard::validate_balances(balances)?;
    settle::resolve(balances, strategy)
}

/// The builder for `Ledger`.
pub struct LedgerBuilder<D> {
    directory: D,
    strategy: SettlementStrategy,
}

impl<D: GroupDirectory> LedgerBuilder<D> {
    /// Override the settlement strategy.
    pub fn strategy(mut self, strategy: SettlementStrategy) -> LedgerBuilder<D> {
        self.strategy = strategy;
        self
    }

    /// Construct `Ledger`.
    pub fn build(self) -> Ledger<D> {
        Ledger {
            directory: self.directory,
            strategy: self.strategy,
        }
    }
}
