//! Transaction construction helpers

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::types::*;

/// Builder for ledger transactions
#[derive(Debug)]
pub struct TransactionBuilder {
    transaction: Transaction,
}

impl TransactionBuilder {
    /// Start a confirmed transaction of the given kind
    pub fn new(id: String, kind: TransactionKind, currency: Currency, amount: BigDecimal) -> Self {
        Self {
            transaction: Transaction::new(id, None, kind, currency, amount),
        }
    }

    /// Set the business date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.transaction.date = Some(date);
        self
    }

    /// Mark the transaction as pending instead of confirmed
    pub fn pending(mut self) -> Self {
        self.transaction.status = TransactionStatus::Pending;
        self
    }

    /// Attach a booking reference
    pub fn booking(mut self, booking_id: String) -> Self {
        self.transaction.booking_id = Some(booking_id);
        self
    }

    /// Tag with a category
    pub fn category(mut self, category: String) -> Self {
        self.transaction.category = Some(category);
        self
    }

    /// Record how the money moved
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.transaction.payment_method = Some(method);
        self
    }

    /// Name the holder answerable for this money
    pub fn responsible(mut self, holder_id: String) -> Self {
        self.transaction.responsible_holder = Some(holder_id);
        self
    }

    /// Set both sides of a transfer
    pub fn between(mut self, from_holder: String, to_holder: String) -> Self {
        self.transaction.from_holder = Some(from_holder);
        self.transaction.to_holder = Some(to_holder);
        self
    }

    /// Set the conversion rate of an exchange
    pub fn rate(mut self, rate: BigDecimal) -> Self {
        self.transaction.exchange_rate = Some(rate);
        self
    }

    /// Mark as materialized by rule-based computation
    pub fn auto_generated(mut self) -> Self {
        self.transaction.auto_generated = true;
        self
    }

    /// Attach free-text notes
    pub fn notes(mut self, notes: String) -> Self {
        self.transaction.notes = Some(notes);
        self
    }

    /// Validate and produce the transaction
    pub fn build(self) -> FinanceResult<Transaction> {
        self.transaction.validate()?;
        Ok(self.transaction)
    }
}

/// Common transaction shapes the intake flows create
pub mod patterns {
    use super::*;

    /// Payment received for a booking into a holder
    pub fn booking_payment(
        id: String,
        date: NaiveDate,
        booking_id: String,
        holder_id: String,
        currency: Currency,
        amount: BigDecimal,
        method: PaymentMethod,
    ) -> FinanceResult<Transaction> {
        TransactionBuilder::new(id, TransactionKind::In, currency, amount)
            .date(date)
            .booking(booking_id)
            .responsible(holder_id)
            .payment_method(method)
            .build()
    }

    /// Expense paid out by a holder
    pub fn expense(
        id: String,
        date: NaiveDate,
        holder_id: String,
        currency: Currency,
        amount: BigDecimal,
        category: Option<String>,
    ) -> FinanceResult<Transaction> {
        let mut builder = TransactionBuilder::new(id, TransactionKind::Out, currency, amount)
            .date(date)
            .responsible(holder_id);
        if let Some(category) = category {
            builder = builder.category(category);
        }
        builder.build()
    }

    /// Movement of money between two holders
    pub fn transfer(
        id: String,
        date: NaiveDate,
        from_holder: String,
        to_holder: String,
        currency: Currency,
        amount: BigDecimal,
    ) -> FinanceResult<Transaction> {
        TransactionBuilder::new(id, TransactionKind::Transfer, currency, amount)
            .date(date)
            .between(from_holder, to_holder)
            .build()
    }

    /// Conversion between the two currencies within one holder
    pub fn exchange(
        id: String,
        date: NaiveDate,
        holder_id: String,
        from_currency: Currency,
        amount: BigDecimal,
        rate: BigDecimal,
    ) -> FinanceResult<Transaction> {
        TransactionBuilder::new(id, TransactionKind::Exchange, from_currency, amount)
            .date(date)
            .responsible(holder_id)
            .rate(rate)
            .build()
    }
}
