//! Schema migration runner for the wallet ledger.
//!
//! Reads `DATABASE_URL` (or `-u <url>`). Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Revert the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop every table and re-apply all migrations

use sea_orm_migration::prelude::*;
use wallet_db::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
