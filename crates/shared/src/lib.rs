//! Shared types, errors, and configuration for the wallet ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money amounts with two-digit decimal precision
//! - Typed IDs for type-safe account references
//! - Application-wide error taxonomy
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult, FieldErrors};
pub use jwt::{JwtConfig, JwtError, JwtService};
