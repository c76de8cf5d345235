//! Service wiring: the account directory and the ledger operations the
//! routes invoke on it.

use std::sync::Arc;

use chrono::NaiveDate;

use finapi_accounts::{
    Account, AccountDirectory, Amount, Balance, Clock, InMemoryAccountDirectory, Operation,
    SystemClock,
};
use finapi_core::{AccountId, LedgerResult};

#[derive(Debug, Clone)]
pub struct AppServices {
    directory: Arc<InMemoryAccountDirectory>,
    clock: Arc<dyn Clock>,
}

impl Default for AppServices {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl AppServices {
    /// In-memory wiring; all state lives for the process lifetime only.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// In-memory wiring with a custom timestamp source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            directory: Arc::new(InMemoryAccountDirectory::new()),
            clock,
        }
    }

    pub fn account_exists(&self, tax_id: &str) -> bool {
        self.directory.view(tax_id, |_| ()).is_ok()
    }

    pub fn open_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<AccountId> {
        self.directory.create_account(tax_id, display_name)
    }

    pub fn account(&self, tax_id: &str) -> LedgerResult<Account> {
        self.directory.find_by_tax_id(tax_id)
    }

    pub fn rename_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<()> {
        self.directory.rename_account(tax_id, display_name)
    }

    pub fn close_account(&self, tax_id: &str) -> LedgerResult<Vec<Account>> {
        self.directory.delete_account(tax_id)
    }

    /// Record a credit, stamped while the account is locked.
    pub fn deposit(
        &self,
        tax_id: &str,
        amount: Amount,
        description: Option<String>,
    ) -> LedgerResult<()> {
        let result = self.directory.update(tax_id, |account| {
            let now = self.clock.now();
            account.ledger_mut().deposit(amount, description, now);
            Ok(())
        });

        match &result {
            Ok(()) => tracing::debug!(tax_id, amount, "deposit recorded"),
            Err(err) => {
                tracing::debug!(tax_id, amount, error_code = err.code(), "deposit rejected")
            }
        }
        result
    }

    /// Record a debit if the balance covers it, stamped while the account is locked.
    pub fn withdraw(&self, tax_id: &str, amount: Amount) -> LedgerResult<()> {
        let result = self.directory.update(tax_id, |account| {
            let now = self.clock.now();
            account.ledger_mut().withdraw(amount, now)
        });

        match &result {
            Ok(()) => tracing::debug!(tax_id, amount, "withdrawal recorded"),
            Err(err) => {
                tracing::info!(tax_id, amount, error_code = err.code(), "withdrawal rejected")
            }
        }
        result
    }

    pub fn balance(&self, tax_id: &str) -> LedgerResult<Balance> {
        let balance = self
            .directory
            .view(tax_id, |account| account.ledger().balance())?;
        tracing::debug!(tax_id, %balance, "balance read");
        Ok(balance)
    }

    pub fn statement(&self, tax_id: &str) -> LedgerResult<Vec<Operation>> {
        let ops = self
            .directory
            .view(tax_id, |account| account.ledger().statement().to_vec())?;
        tracing::debug!(tax_id, operations = ops.len(), "statement read");
        Ok(ops)
    }

    /// Operations recorded on `day`; no day matches nothing.
    pub fn statement_on(
        &self,
        tax_id: &str,
        day: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Operation>> {
        let ops = self.directory.view(tax_id, |account| match day {
            Some(day) => account.ledger().statement_on(day).cloned().collect(),
            None => Vec::new(),
        })?;
        tracing::debug!(
            tax_id,
            day = ?day,
            operations = ops.len(),
            "statement by date read"
        );
        Ok(ops)
    }
}
