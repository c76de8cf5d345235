//! Account directory: the set of accounts, keyed by tax identifier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use finapi_core::{AccountId, LedgerError, LedgerResult};

use crate::account::Account;

/// Canonical form of a tax identifier.
///
/// Surrounding whitespace is dropped. What remains must be non-empty visible
/// ASCII (inner spaces allowed), i.e. something a client can send back in a
/// header verbatim.
pub fn normalize_tax_id(raw: &str) -> LedgerResult<&str> {
    let tax_id = raw.trim();
    if tax_id.is_empty() || !tax_id.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
        return Err(LedgerError::InvalidTaxId);
    }
    Ok(tax_id)
}

/// Lookup key for an existing account; an unusable identifier cannot match one.
fn lookup_key(raw: &str) -> LedgerResult<&str> {
    normalize_tax_id(raw).map_err(|_| LedgerError::AccountNotFound)
}

/// Directory of accounts, unique per tax identifier.
///
/// Every operation on an existing account resolves it by tax identifier first;
/// an unknown identifier yields [`LedgerError::AccountNotFound`]. Identifiers
/// are compared in their [`normalize_tax_id`] form.
pub trait AccountDirectory: Send + Sync {
    /// Open an account with an empty ledger.
    fn create_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<AccountId>;

    /// Snapshot of the account registered under `tax_id`.
    fn find_by_tax_id(&self, tax_id: &str) -> LedgerResult<Account>;

    fn rename_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<()>;

    /// Remove the account (and its ledger), returning the accounts that remain.
    fn delete_account(&self, tax_id: &str) -> LedgerResult<Vec<Account>>;

    /// All accounts, in creation order.
    fn list_accounts(&self) -> Vec<Account>;

    /// Read an account in place without cloning it.
    fn view<R, F>(&self, tax_id: &str, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&Account) -> R;

    /// Mutate an account while holding its lock.
    ///
    /// Read-then-write sequences (e.g. a withdrawal's balance check) are atomic
    /// with respect to every other operation on the same account.
    fn update<R, F>(&self, tax_id: &str, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut Account) -> LedgerResult<R>;
}

impl<S> AccountDirectory for Arc<S>
where
    S: AccountDirectory,
{
    fn create_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<AccountId> {
        (**self).create_account(tax_id, display_name)
    }

    fn find_by_tax_id(&self, tax_id: &str) -> LedgerResult<Account> {
        (**self).find_by_tax_id(tax_id)
    }

    fn rename_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<()> {
        (**self).rename_account(tax_id, display_name)
    }

    fn delete_account(&self, tax_id: &str) -> LedgerResult<Vec<Account>> {
        (**self).delete_account(tax_id)
    }

    fn list_accounts(&self) -> Vec<Account> {
        (**self).list_accounts()
    }

    fn view<R, F>(&self, tax_id: &str, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&Account) -> R,
    {
        (**self).view(tax_id, f)
    }

    fn update<R, F>(&self, tax_id: &str, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut Account) -> LedgerResult<R>,
    {
        (**self).update(tax_id, f)
    }
}

#[derive(Debug)]
struct Entry {
    /// Creation order, used to list accounts stably.
    seq: u64,
    account: Arc<Mutex<Account>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    accounts: HashMap<String, Entry>,
}

impl Inner {
    fn snapshot(&self) -> Vec<Account> {
        let mut entries: Vec<&Entry> = self.accounts.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries
            .into_iter()
            .map(|e| lock_account(&e.account).clone())
            .collect()
    }
}

fn lock_account(account: &Mutex<Account>) -> std::sync::MutexGuard<'_, Account> {
    // Every mutation is a single push or field write, so a poisoned account
    // is still consistent.
    account.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory directory: process-lifetime state only.
///
/// The map lock guards structural changes (create/delete); each account has
/// its own mutex so ledger mutations on different accounts do not contend.
/// Lock order is always map, then account.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn create_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<AccountId> {
        let tax_id = normalize_tax_id(tax_id)?;
        let mut inner = self.write();
        if inner.accounts.contains_key(tax_id) {
            tracing::info!(tax_id, "account already exists");
            return Err(LedgerError::DuplicateAccount);
        }

        let account = Account::open(tax_id, display_name);
        let id = account.id_typed();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.accounts.insert(
            tax_id.to_string(),
            Entry {
                seq,
                account: Arc::new(Mutex::new(account)),
            },
        );

        tracing::info!(tax_id, account_id = %id, "account created");
        Ok(id)
    }

    fn find_by_tax_id(&self, tax_id: &str) -> LedgerResult<Account> {
        self.view(tax_id, Account::clone)
    }

    fn rename_account(&self, tax_id: &str, display_name: &str) -> LedgerResult<()> {
        self.update(tax_id, |account| {
            account.rename(display_name);
            Ok(())
        })?;
        tracing::info!(tax_id = tax_id.trim(), "account renamed");
        Ok(())
    }

    fn delete_account(&self, tax_id: &str) -> LedgerResult<Vec<Account>> {
        let tax_id = lookup_key(tax_id)?;
        let mut inner = self.write();
        let removed = inner
            .accounts
            .remove(tax_id)
            .ok_or(LedgerError::AccountNotFound)?;

        tracing::info!(
            tax_id,
            account_id = %lock_account(&removed.account).id_typed(),
            "account deleted"
        );
        Ok(inner.snapshot())
    }

    fn list_accounts(&self) -> Vec<Account> {
        self.read().snapshot()
    }

    fn view<R, F>(&self, tax_id: &str, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&Account) -> R,
    {
        let tax_id = lookup_key(tax_id)?;
        let inner = self.read();
        let entry = inner
            .accounts
            .get(tax_id)
            .ok_or(LedgerError::AccountNotFound)?;
        let account = lock_account(&entry.account);
        Ok(f(&account))
    }

    fn update<R, F>(&self, tax_id: &str, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut Account) -> LedgerResult<R>,
    {
        // Holding the read lock keeps the account reachable until `f` returns,
        // so a concurrent delete cannot strand an append on a detached ledger.
        let tax_id = lookup_key(tax_id)?;
        let inner = self.read();
        let entry = inner
            .accounts
            .get(tax_id)
            .ok_or(LedgerError::AccountNotFound)?;
        let mut account = lock_account(&entry.account);
        f(&mut account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::thread;

    #[test]
    fn duplicate_tax_id_is_rejected_and_first_account_survives() {
        let dir = InMemoryAccountDirectory::new();
        let first = dir.create_account("111", "Ada").unwrap();
        dir.update("111", |a| {
            a.ledger_mut().deposit(25, None, Utc::now());
            Ok(())
        })
        .unwrap();

        let err = dir.create_account("111", "Mallory").unwrap_err();
        assert_eq!(err, LedgerError::DuplicateAccount);

        let account = dir.find_by_tax_id("111").unwrap();
        assert_eq!(account.id_typed(), first);
        assert_eq!(account.display_name(), "Ada");
        assert_eq!(account.ledger().balance(), 25);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn tax_ids_are_trimmed_and_must_be_header_safe() {
        assert_eq!(normalize_tax_id("  222 ").unwrap(), "222");
        assert_eq!(normalize_tax_id("123 456").unwrap(), "123 456");
        assert_eq!(normalize_tax_id("   ").unwrap_err(), LedgerError::InvalidTaxId);
        assert_eq!(normalize_tax_id("ção").unwrap_err(), LedgerError::InvalidTaxId);
        assert_eq!(normalize_tax_id("1\t2").unwrap_err(), LedgerError::InvalidTaxId);
    }

    #[test]
    fn padded_tax_id_resolves_to_the_same_account() {
        let dir = InMemoryAccountDirectory::new();
        let id = dir.create_account(" 222 ", "Ada").unwrap();

        assert_eq!(dir.find_by_tax_id("222").unwrap().id_typed(), id);
        assert_eq!(dir.find_by_tax_id("222").unwrap().tax_id(), "222");
        assert_eq!(
            dir.create_account("222", "Mallory").unwrap_err(),
            LedgerError::DuplicateAccount
        );
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn unusable_tax_id_is_rejected_at_creation() {
        let dir = InMemoryAccountDirectory::new();
        assert_eq!(dir.create_account("ção", "Ada").unwrap_err(), LedgerError::InvalidTaxId);
        assert_eq!(dir.create_account("", "Ada").unwrap_err(), LedgerError::InvalidTaxId);
        assert!(dir.is_empty());
        assert_eq!(dir.find_by_tax_id("ção").unwrap_err(), LedgerError::AccountNotFound);
    }

    #[test]
    fn unknown_tax_id_is_not_found_everywhere() {
        let dir = InMemoryAccountDirectory::new();

        assert_eq!(dir.find_by_tax_id("nope").unwrap_err(), LedgerError::AccountNotFound);
        assert_eq!(dir.rename_account("nope", "x").unwrap_err(), LedgerError::AccountNotFound);
        assert_eq!(dir.delete_account("nope").unwrap_err(), LedgerError::AccountNotFound);
        assert_eq!(
            dir.view("nope", |a| a.ledger().balance()).unwrap_err(),
            LedgerError::AccountNotFound
        );
        assert_eq!(
            dir.update("nope", |_| Ok(())).unwrap_err(),
            LedgerError::AccountNotFound
        );
    }

    #[test]
    fn rename_replaces_display_name_only() {
        let dir = InMemoryAccountDirectory::new();
        let id = dir.create_account("111", "Ada").unwrap();
        dir.update("111", |a| {
            a.ledger_mut().deposit(5, None, Utc::now());
            Ok(())
        })
        .unwrap();

        dir.rename_account("111", "Ada L.").unwrap();

        let account = dir.find_by_tax_id("111").unwrap();
        assert_eq!(account.display_name(), "Ada L.");
        assert_eq!(account.id_typed(), id);
        assert_eq!(account.ledger().len(), 1);
    }

    #[test]
    fn delete_removes_account_and_returns_the_rest_in_creation_order() {
        let dir = InMemoryAccountDirectory::new();
        dir.create_account("111", "A").unwrap();
        dir.create_account("222", "B").unwrap();
        dir.create_account("333", "C").unwrap();

        let remaining = dir.delete_account("222").unwrap();
        let tax_ids: Vec<&str> = remaining.iter().map(|a| a.tax_id()).collect();
        assert_eq!(tax_ids, vec!["111", "333"]);

        assert_eq!(dir.find_by_tax_id("222").unwrap_err(), LedgerError::AccountNotFound);
        assert_eq!(
            dir.update("222", |a| a.ledger_mut().withdraw(0, Utc::now())).unwrap_err(),
            LedgerError::AccountNotFound
        );
    }

    #[test]
    fn recreated_account_starts_with_fresh_id_and_empty_ledger() {
        let dir = InMemoryAccountDirectory::new();
        let first = dir.create_account("111", "A").unwrap();
        dir.update("111", |a| {
            a.ledger_mut().deposit(10, None, Utc::now());
            Ok(())
        })
        .unwrap();
        dir.delete_account("111").unwrap();

        let second = dir.create_account("111", "A").unwrap();
        assert_ne!(first, second);
        assert!(dir.find_by_tax_id("111").unwrap().ledger().is_empty());
    }

    #[test]
    fn concurrent_withdrawals_never_overdraw() {
        let dir = Arc::new(InMemoryAccountDirectory::new());
        dir.create_account("111", "A").unwrap();
        dir.update("111", |a| {
            a.ledger_mut().deposit(100, None, Utc::now());
            Ok(())
        })
        .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let dir = dir.clone();
                thread::spawn(move || {
                    dir.update("111", |a| a.ledger_mut().withdraw(10, Utc::now()))
                        .is_ok()
                })
            })
            .collect();

        let succeeded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(succeeded, 10);
        assert_eq!(dir.view("111", |a| a.ledger().balance()).unwrap(), 0);
    }
}
