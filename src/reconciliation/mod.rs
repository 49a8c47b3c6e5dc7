//! Booking reconciliation: financial rollups, loose-transaction matching,
//! and materialization of derived expenses

pub mod generator;
pub mod matcher;
pub mod rollup;

pub use generator::*;
pub use matcher::*;
pub use rollup::*;
