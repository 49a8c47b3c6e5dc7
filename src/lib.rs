//! # Tour Finance Core
//!
//! The ledger and booking-reconciliation engine behind a tour operator's
//! operations dashboard: multi-currency holder balances, per-booking
//! financial rollups, derived expense materialization, loose-transaction
//! matching, and anomaly alerts.
//!
//! ## Features
//!
//! - **Multi-currency balances**: per-holder, per-currency confirmed and
//!   pending positions folded from the append-only transaction log
//! - **Booking rollups**: revenue, expenses, received, remaining, net, and a
//!   payment-status classification per booking
//! - **Derived expenses**: rule-based meal costs materialized idempotently as
//!   real transactions
//! - **Loose-transaction matching**: scored booking proposals for payments
//!   that arrived without a reference
//! - **Alerts**: mismatched payment methods, negative balances, stale pending
//!   items, idle cash
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use tour_finance_core::{FinanceBoard, MemoryStorage};
//!
//! // The dashboard hands in its storage backend; MemoryStorage works for
//! // tests and examples.
//! let board = FinanceBoard::new(MemoryStorage::new());
//! ```
//!
//! Every aggregate is recomputed from the full non-void transaction set on
//! each query; nothing is incrementally maintained. Void transactions never
//! influence any figure.

pub mod alerts;
pub mod ledger;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use alerts::*;
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
pub use utils::MemoryStorage;

// Re-export transaction patterns for convenience
pub use ledger::transaction::patterns;
