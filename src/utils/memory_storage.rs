//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory `FinanceStorage` backend.
///
/// Clones share state, which mirrors how several engines point at one real
/// store in production.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    bookings: Arc<RwLock<HashMap<String, Booking>>>,
    holders: Arc<RwLock<HashMap<String, Holder>>>,
    expenses: Arc<RwLock<HashMap<String, ExpenseRecord>>>,
    rate: Arc<RwLock<ExchangeRate>>,
}

impl MemoryStorage {
    /// Create an empty store with a 1:1 exchange rate
    pub fn new() -> Self {
        Self {
            transactions: Arc::new(RwLock::new(HashMap::new())),
            bookings: Arc::new(RwLock::new(HashMap::new())),
            holders: Arc::new(RwLock::new(HashMap::new())),
            expenses: Arc::new(RwLock::new(HashMap::new())),
            rate: Arc::new(RwLock::new(ExchangeRate::new(
                BigDecimal::from(1),
                BigDecimal::from(1),
            ))),
        }
    }

    /// Seed a holder
    pub fn add_holder(&self, holder: Holder) {
        self.holders.write().unwrap().insert(holder.id.clone(), holder);
    }

    /// Seed a booking
    pub fn add_booking(&self, booking: Booking) {
        self.bookings
            .write()
            .unwrap()
            .insert(booking.id.clone(), booking);
    }

    /// Seed an expense record
    pub fn add_expense_record(&self, record: ExpenseRecord) {
        self.expenses.write().unwrap().insert(record.id.clone(), record);
    }

    /// Seed a transaction directly, bypassing entry validation
    pub fn seed_transaction(&self, transaction: Transaction) {
        self.transactions
            .write()
            .unwrap()
            .insert(transaction.id.clone(), transaction);
    }

    /// Replace the current exchange rate
    pub fn set_exchange_rate(&self, rate: ExchangeRate) {
        *self.rate.write().unwrap() = rate;
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.transactions.write().unwrap().clear();
        self.bookings.write().unwrap().clear();
        self.holders.write().unwrap().clear();
        self.expenses.write().unwrap().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FinanceStorage for MemoryStorage {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> FinanceResult<Vec<Transaction>> {
        let transactions = self.transactions.read().unwrap();
        Ok(transactions
            .values()
            .filter(|txn| filter.matches(txn))
            .cloned()
            .collect())
    }

    async fn get_transaction(&self, transaction_id: &str) -> FinanceResult<Option<Transaction>> {
        Ok(self
            .transactions
            .read()
            .unwrap()
            .get(transaction_id)
            .cloned())
    }

    async fn save_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()> {
        self.transactions
            .write()
            .unwrap()
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    async fn update_transaction(&mut self, transaction: &Transaction) -> FinanceResult<()> {
        let mut transactions = self.transactions.write().unwrap();
        if transactions.contains_key(&transaction.id) {
            transactions.insert(transaction.id.clone(), transaction.clone());
            Ok(())
        } else {
            Err(FinanceError::TransactionNotFound(transaction.id.clone()))
        }
    }

    async fn list_bookings(&self) -> FinanceResult<Vec<Booking>> {
        Ok(self.bookings.read().unwrap().values().cloned().collect())
    }

    async fn get_booking(&self, booking_id: &str) -> FinanceResult<Option<Booking>> {
        Ok(self.bookings.read().unwrap().get(booking_id).cloned())
    }

    async fn list_holders(&self, active_only: bool) -> FinanceResult<Vec<Holder>> {
        let holders = self.holders.read().unwrap();
        Ok(holders
            .values()
            .filter(|holder| !active_only || holder.active)
            .cloned()
            .collect())
    }

    async fn get_holder(&self, holder_id: &str) -> FinanceResult<Option<Holder>> {
        Ok(self.holders.read().unwrap().get(holder_id).cloned())
    }

    async fn list_expense_records(&self, booking_id: &str) -> FinanceResult<Vec<ExpenseRecord>> {
        let expenses = self.expenses.read().unwrap();
        Ok(expenses
            .values()
            .filter(|record| record.booking_id == booking_id)
            .cloned()
            .collect())
    }

    async fn exchange_rate(&self) -> FinanceResult<ExchangeRate> {
        Ok(self.rate.read().unwrap().clone())
    }
}
