//! Ledger module containing balance aggregation and the finance board

pub mod balance;
pub mod core;
pub mod transaction;

pub use balance::*;
pub use core::*;
pub use transaction::*;
