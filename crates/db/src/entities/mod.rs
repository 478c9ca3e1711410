//! `SeaORM` entity definitions.

pub mod accounts;
pub mod deposits;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod transfers;
pub mod withdrawals;

pub use sea_orm_active_enums::TransactionKind;
