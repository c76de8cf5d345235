use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use finapi_core::{LedgerError, LedgerResult};

/// Amount in smallest currency unit (e.g., cents).
///
/// No sign check is applied: a negative deposit is accepted and behaves like
/// a debit.
pub type Amount = i64;

/// Running balance. Wider than `Amount` so the fold cannot overflow.
pub type Balance = i128;

/// Direction of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Credit,
    Debit,
}

/// One ledger entry (immutable once appended).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub amount: Amount,
    /// Only credits carry a description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "created_at")]
    pub occurred_at: DateTime<Utc>,
}

impl Operation {
    /// Contribution of this operation to the balance.
    pub fn signed_amount(&self) -> Balance {
        match self.kind {
            OperationKind::Credit => Balance::from(self.amount),
            OperationKind::Debit => -Balance::from(self.amount),
        }
    }

    /// UTC calendar day the operation was appended on.
    pub fn calendar_day(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }
}

/// Append-only operation history of a single account.
///
/// The balance is never cached; it is folded from the history on every call.
/// Timestamps never decrease along the history: an append stamped earlier
/// than the last operation takes the last operation's timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    operations: Vec<Operation>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a credit. Always succeeds.
    pub fn deposit(
        &mut self,
        amount: Amount,
        description: Option<String>,
        occurred_at: DateTime<Utc>,
    ) {
        let occurred_at = self.not_before_last(occurred_at);
        self.operations.push(Operation {
            kind: OperationKind::Credit,
            amount,
            description,
            occurred_at,
        });
    }

    /// Append a debit if the current balance covers `amount`.
    ///
    /// Withdrawing exactly the balance is allowed. On failure nothing is appended.
    pub fn withdraw(&mut self, amount: Amount, occurred_at: DateTime<Utc>) -> LedgerResult<()> {
        if self.balance() < Balance::from(amount) {
            return Err(LedgerError::InsufficientFunds);
        }

        let occurred_at = self.not_before_last(occurred_at);
        self.operations.push(Operation {
            kind: OperationKind::Debit,
            amount,
            description: None,
            occurred_at,
        });
        Ok(())
    }

    /// Credits minus debits, folded left to right from zero.
    pub fn balance(&self) -> Balance {
        self.operations
            .iter()
            .fold(0, |acc, op| acc + op.signed_amount())
    }

    /// Full history in insertion order.
    pub fn statement(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations appended on the given UTC calendar day, in insertion order.
    pub fn statement_on(&self, day: NaiveDate) -> impl Iterator<Item = &Operation> + '_ {
        self.operations
            .iter()
            .filter(move |op| op.calendar_day() == day)
    }

    fn not_before_last(&self, occurred_at: DateTime<Utc>) -> DateTime<Utc> {
        match self.operations.last() {
            Some(last) => occurred_at.max(last.occurred_at),
            None => occurred_at,
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
