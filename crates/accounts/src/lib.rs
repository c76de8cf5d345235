//! Accounts module (per-account ledgers + the directory that owns them).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod clock;
pub mod directory;
pub mod ledger;

pub use account::Account;
pub use clock::{Clock, SystemClock};
pub use directory::{normalize_tax_id, AccountDirectory, InMemoryAccountDirectory};
pub use ledger::{Amount, Balance, Ledger, Operation, OperationKind};
