use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod member {
    use super::*;

    /// A member as rendered to API clients.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
    }
}

pub mod balance {
    use super::*;

    /// One member's net position.
    ///
    /// Amounts travel as integer minor units (cents); clients must not round
    /// through binary floating point.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub member_id: Uuid,
        pub balance_minor: i64,
        /// `true` when the member is owed money.
        pub is_creditor: bool,
    }

    /// Response body for a balance computation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalancesResponse {
        pub member_balances: Vec<BalanceView>,
        pub total_expenses_minor: i64,
        pub per_capita_cost_minor: i64,
    }
}

pub mod settlement {
    use super::*;

    /// Settlement strategy selector, mirrored from the engine.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Strategy {
        TwoPointer,
        #[default]
        MaxPair,
    }

    /// A proposed debtor-to-creditor transfer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementView {
        pub from: Uuid,
        pub to: Uuid,
        pub amount_minor: i64,
    }

    /// Response body for pending-debt resolution.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingDebtsResponse {
        pub transactions: Vec<SettlementView>,
    }

    /// One entry of a caller-supplied balance vector.
    ///
    /// Deliberately lenient: both fields are optional and the balance is raw
    /// JSON, so the engine can answer with its own malformed-payload
    /// diagnostic instead of an opaque deserialization error. Integers are
    /// minor units; strings are decimal currency units.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RawBalance {
        #[serde(default)]
        pub member_id: Option<Uuid>,
        #[serde(default)]
        pub balance: Option<serde_json::Value>,
    }

    /// Request body for the simplify entry point.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SimplifyRequest {
        pub balances: Vec<RawBalance>,
        #[serde(default)]
        pub strategy: Option<Strategy>,
    }
}
