//! Finance board orchestrating balances, rollups, matching, and alerts
//!
//! Every query fetches a fresh snapshot from storage and folds it from
//! scratch; nothing is cached between calls. The board is the only place
//! that writes: new transactions, status flips, booking attachments, and the
//! derived meal expenses.

use chrono::NaiveDate;

use crate::alerts::{self, Alert, AlertPolicy};
use crate::ledger::balance::{balance_for_holder, balances_for_holders, HolderBalance};
use crate::reconciliation::generator::MealExpenseGenerator;
use crate::reconciliation::matcher::{suggest_for_loose, MatchSuggestion};
use crate::reconciliation::rollup::{rollup_booking, BookingFinancials, MealsPolicy};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_new_transaction;

/// Entry point of the finance subsystem.
///
/// Generic over the storage backend; the surrounding dashboard hands in its
/// store and reads derived views back.
pub struct FinanceBoard<S: FinanceStorage> {
    storage: S,
    generator: MealExpenseGenerator<S>,
    meals_policy: MealsPolicy,
    alert_policy: AlertPolicy,
}

impl<S: FinanceStorage + Clone> FinanceBoard<S> {
    /// Create a board with default policies
    pub fn new(storage: S) -> Self {
        Self::with_policies(storage, MealsPolicy::default(), AlertPolicy::default())
    }

    /// Create a board with explicit policies
    pub fn with_policies(storage: S, meals_policy: MealsPolicy, alert_policy: AlertPolicy) -> Self {
        Self {
            generator: MealExpenseGenerator::new(storage.clone(), meals_policy.clone()),
            storage,
            meals_policy,
            alert_policy,
        }
    }

    // Balance views

    /// Balance snapshots for every active holder
    pub async fn holder_balances(&self) -> FinanceResult<Vec<HolderBalance>> {
        let holders = self.storage.list_holders(true).await?;
        let transactions = self
            .storage
            .list_transactions(&TransactionFilter::all())
            .await?;
        Ok(balances_for_holders(&holders, &transactions))
    }

    /// Balance snapshot for one holder
    pub async fn holder_balance(&self, holder_id: &str) -> FinanceResult<HolderBalance> {
        let holder = self
            .storage
            .get_holder(holder_id)
            .await?
            .ok_or_else(|| FinanceError::HolderNotFound(holder_id.to_string()))?;
        let transactions = self
            .storage
            .list_transactions(&TransactionFilter::all())
            .await?;
        Ok(balance_for_holder(&holder, &transactions))
    }

    // Booking views

    /// Financial rows for every booking with a positive price
    pub async fn booking_rows(&self) -> FinanceResult<Vec<BookingFinancials>> {
        let bookings = self.storage.list_bookings().await?;
        let rate = self.storage.exchange_rate().await?;

        let mut rows = Vec::with_capacity(bookings.len());
        for booking in &bookings {
            let transactions = self
                .storage
                .list_transactions(&TransactionFilter::for_booking(&booking.id))
                .await?;
            let expenses = self.storage.list_expense_records(&booking.id).await?;
            if let Some(row) =
                rollup_booking(booking, &transactions, &expenses, &rate, &self.meals_policy)
            {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    /// Financial row for one booking; `None` when the booking is priced out
    /// of rollup scope
    pub async fn booking_row(&self, booking_id: &str) -> FinanceResult<Option<BookingFinancials>> {
        let booking = self
            .storage
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| FinanceError::BookingNotFound(booking_id.to_string()))?;
        let rate = self.storage.exchange_rate().await?;
        let transactions = self
            .storage
            .list_transactions(&TransactionFilter::for_booking(booking_id))
            .await?;
        let expenses = self.storage.list_expense_records(booking_id).await?;
        Ok(rollup_booking(
            &booking,
            &transactions,
            &expenses,
            &rate,
            &self.meals_policy,
        ))
    }

    // Reconciliation

    /// Booking proposals for every transaction without one
    pub async fn loose_suggestions(&self) -> FinanceResult<Vec<MatchSuggestion>> {
        let transactions = self
            .storage
            .list_transactions(&TransactionFilter::all())
            .await?;
        let bookings = self.storage.list_bookings().await?;
        Ok(suggest_for_loose(&transactions, &bookings))
    }

    /// Materialize derived meal expenses for every qualifying booking,
    /// returning the transactions created this pass
    pub async fn materialize_meal_expenses(&mut self) -> FinanceResult<Vec<Transaction>> {
        self.generator.materialize_all().await
    }

    // Alerts

    /// Scan holders and transactions for anomalies as of `today`
    pub async fn scan_alerts(&self, today: NaiveDate) -> FinanceResult<Vec<Alert>> {
        let holders = self.storage.list_holders(true).await?;
        let transactions = self
            .storage
            .list_transactions(&TransactionFilter::all())
            .await?;
        Ok(alerts::scan(
            &holders,
            &transactions,
            today,
            &self.alert_policy,
        ))
    }

    // Record mutation (the only lifecycle changes transactions allow)

    /// Validate and append a transaction to the log
    pub async fn record_transaction(&mut self, transaction: Transaction) -> FinanceResult<()> {
        validate_new_transaction(&transaction)?;
        self.storage.save_transaction(&transaction).await?;
        tracing::debug!(transaction = %transaction.id, kind = ?transaction.kind, "recorded transaction");
        Ok(())
    }

    /// Flip a transaction's status (pending confirmation, or voiding)
    pub async fn set_transaction_status(
        &mut self,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> FinanceResult<Transaction> {
        let mut transaction = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| FinanceError::TransactionNotFound(transaction_id.to_string()))?;

        transaction.status = status;
        transaction.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_transaction(&transaction).await?;
        tracing::info!(transaction = %transaction_id, status = ?status, "status changed");
        Ok(transaction)
    }

    /// Attach a booking to a loose transaction (suggestion acceptance)
    pub async fn attach_booking(
        &mut self,
        transaction_id: &str,
        booking_id: &str,
    ) -> FinanceResult<Transaction> {
        if self.storage.get_booking(booking_id).await?.is_none() {
            return Err(FinanceError::BookingNotFound(booking_id.to_string()));
        }

        let mut transaction = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| FinanceError::TransactionNotFound(transaction_id.to_string()))?;

        transaction.booking_id = Some(booking_id.to_string());
        transaction.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_transaction(&transaction).await?;
        tracing::info!(
            transaction = %transaction_id,
            booking = %booking_id,
            "booking attached"
        );
        Ok(transaction)
    }
}
