//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Filter for transaction queries.
///
/// Void transactions are never returned regardless of the filter; a record
/// with no date is excluded whenever a date bound is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Earliest business date, inclusive
    pub from: Option<NaiveDate>,
    /// Latest business date, inclusive
    pub to: Option<NaiveDate>,
    /// Only transactions attached to this booking
    pub booking_id: Option<String>,
    /// Only transactions touching this holder in any role
    pub holder_id: Option<String>,
    /// Only transactions of this kind
    pub kind: Option<TransactionKind>,
    /// Only transactions in this status
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    /// Filter that matches every non-void transaction
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter scoped to one booking
    pub fn for_booking(booking_id: &str) -> Self {
        Self {
            booking_id: Some(booking_id.to_string()),
            ..Self::default()
        }
    }

    /// Filter scoped to one holder
    pub fn for_holder(holder_id: &str) -> Self {
        Self {
            holder_id: Some(holder_id.to_string()),
            ..Self::default()
        }
    }

    /// Whether a transaction passes this filter. Void records never pass.
    pub fn matches(&self, txn: &Transaction) -> bool {
        if txn.is_void() {
            return false;
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = txn.date else {
                return false;
            };
            if let Some(from) = self.from {
                if date < from {
                    return false;
                }
            }
            if let Some(to) = self.to {
                if date > to {
                    return false;
                }
            }
        }

        if let Some(ref booking_id) = self.booking_id {
            if txn.booking_id.as_deref() != Some(booking_id.as_str()) {
                return false;
            }
        }

        if let Some(ref holder_id) = self.holder_id {
            if !txn.touches_holder(holder_id) {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }

        if let Some(status) = self.status {
            if txn.status != status {
                return false;
            }
        }

        true
    }
}

/// Storage abstraction for the finance subsystem.
///
/// Record persistence, reference-data administration, and the current
/// exchange rate live outside this crate; this trait is the seam they are
/// reached through. Implementations must never return void transactions
/// from `list_transactions`.
#[async_trait]
pub trait FinanceStorage: Send + Sync {
    /// List non-void transactions matching the filter
    async fn list_transactions(&self, filter: &TransactionFilter)
        -> FinanceResult<Vec<Transaction>>;

    /// Get a transaction by id
    async fn get_transaction(&self, transaction_id: &str) -> FinanceResult<Option<Transaction>>;

    /// Append a transaction to the log
    async fn save_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()>;

    /// Update a transaction in place (status flips and booking attachment)
    async fn update_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()>;

    /// List bookings
    async fn list_bookings(&self) -> FinanceResult<Vec<Booking>>;

    /// Get a booking by id
    async fn get_booking(&self, booking_id: &str) -> FinanceResult<Option<Booking>>;

    /// List holders; `active_only` drops deactivated ones
    async fn list_holders(&self, active_only: bool) -> FinanceResult<Vec<Holder>>;

    /// Get a holder by id
    async fn get_holder(&self, holder_id: &str) -> FinanceResult<Option<Holder>>;

    /// List standalone expense records for a booking
    async fn list_expense_records(&self, booking_id: &str) -> FinanceResult<Vec<ExpenseRecord>>;

    /// Read the current exchange rate
    async fn exchange_rate(&self) -> FinanceResult<ExchangeRate>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn txn(date: Option<NaiveDate>) -> Transaction {
        Transaction::new(
            "t".to_string(),
            date,
            TransactionKind::In,
            Currency::Usd,
            BigDecimal::from(100),
        )
    }

    #[test]
    fn undated_records_are_excluded_from_date_filtered_views() {
        let filter = TransactionFilter {
            from: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..TransactionFilter::default()
        };
        assert!(!filter.matches(&txn(None)));
        assert!(filter.matches(&txn(NaiveDate::from_ymd_opt(2024, 5, 2))));
    }

    #[test]
    fn undated_records_pass_when_no_date_bound_is_set() {
        assert!(TransactionFilter::all().matches(&txn(None)));
    }

    #[test]
    fn void_records_never_match() {
        let mut void = txn(NaiveDate::from_ymd_opt(2024, 5, 2));
        void.status = TransactionStatus::Void;
        assert!(!TransactionFilter::all().matches(&void));
    }

    #[test]
    fn filter_scopes_by_booking_and_kind() {
        let mut t = txn(None);
        t.booking_id = Some("b1".to_string());

        assert!(TransactionFilter::for_booking("b1").matches(&t));
        assert!(!TransactionFilter::for_booking("b2").matches(&t));

        let out_only = TransactionFilter {
            kind: Some(TransactionKind::Out),
            ..TransactionFilter::default()
        };
        assert!(!out_only.matches(&t));
    }
}
