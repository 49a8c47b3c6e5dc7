//! Idempotent materialization of derived meal expenses

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::ledger::transaction::TransactionBuilder;
use crate::reconciliation::rollup::{meals_expense, MealsPolicy};
use crate::traits::{FinanceStorage, TransactionFilter};
use crate::types::*;

/// Materializes the rule-based meals expense of a booking as a real
/// transaction in the store, at most once per booking.
///
/// Two independent recompute cycles may race on the same booking after a data
/// refresh, so creation is gated twice: an in-process marker set claimed
/// atomically, and a fresh store existence check immediately before insert.
/// "Already exists" is success, never an error.
pub struct MealExpenseGenerator<S> {
    storage: S,
    policy: MealsPolicy,
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl<S: FinanceStorage> MealExpenseGenerator<S> {
    /// Create a generator over the given store
    pub fn new(storage: S, policy: MealsPolicy) -> Self {
        Self {
            storage,
            policy,
            claimed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Ensure the booking's meal expense exists in the store.
    ///
    /// Returns the created transaction, or `None` when nothing needed
    /// creating (no qualifying meals, or a breakfast transaction already
    /// exists). Write failures release the in-process claim and surface to
    /// the caller; the next recompute cycle retries naturally.
    pub async fn materialize(&mut self, booking: &Booking) -> FinanceResult<Option<Transaction>> {
        let amount = meals_expense(booking, &self.policy);
        if amount <= BigDecimal::from(0) {
            return Ok(None);
        }

        {
            let mut claimed = self.claimed.lock().unwrap();
            if !claimed.insert(booking.id.clone()) {
                return Ok(None);
            }
        }

        let existing = self
            .storage
            .list_transactions(&TransactionFilter::for_booking(&booking.id))
            .await?;
        if existing
            .iter()
            .any(|txn| txn.has_category(categories::BREAKFAST))
        {
            return Ok(None);
        }

        let txn = TransactionBuilder::new(
            Uuid::new_v4().to_string(),
            TransactionKind::Out,
            Currency::BASE,
            amount,
        )
        .date(booking.arrival)
        .booking(booking.id.clone())
        .category(categories::BREAKFAST.to_string())
        .auto_generated()
        .build()?;

        if let Err(err) = self.storage.save_transaction(&txn).await {
            self.claimed.lock().unwrap().remove(&booking.id);
            return Err(err);
        }

        tracing::info!(
            booking = %booking.id,
            amount = %txn.amount,
            "materialized meal expense"
        );
        Ok(Some(txn))
    }

    /// Run the generator over every booking in the store, returning the
    /// transactions created this pass.
    pub async fn materialize_all(&mut self) -> FinanceResult<Vec<Transaction>> {
        let bookings = self.storage.list_bookings().await?;
        let mut created = Vec::new();
        for booking in &bookings {
            if let Some(txn) = self.materialize(booking).await? {
                created.push(txn);
            }
        }
        Ok(created)
    }
}
