//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod history;
pub mod ledger;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use history::HistoryRepository;
pub use ledger::{LedgerReceipt, LedgerRepoError, LedgerRepository};
