//! Core types and data structures for the tour finance system

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The two currencies the ledger operates in.
///
/// Every amount is tagged with one of these; balances are kept per currency
/// and are never silently combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US dollar, symbol `$`
    Usd,
    /// Euro, symbol `€`
    Eur,
}

impl Currency {
    /// Currency used when cross-currency figures must be reported as one number
    /// (booking rollups, display totals).
    pub const BASE: Currency = Currency::Usd;

    /// ISO-style currency code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Single-character display symbol
    pub fn symbol(&self) -> char {
        match self {
            Currency::Usd => '$',
            Currency::Eur => '€',
        }
    }

    /// The opposite supported currency
    pub fn other(&self) -> Currency {
        match self {
            Currency::Usd => Currency::Eur,
            Currency::Eur => Currency::Usd,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Format an amount for display: currency symbol plus the amount rounded to
/// the nearest whole unit. Display-only; computations never round this way.
pub fn format_amount(amount: &BigDecimal, currency: Currency) -> String {
    format!(
        "{}{}",
        currency.symbol(),
        amount.with_scale_round(0, RoundingMode::HalfUp)
    )
}

/// Bidirectional exchange rate between the two supported currencies.
///
/// The rate is administered elsewhere and consumed read-only here. It is
/// always passed explicitly into the functions that convert, so aggregation
/// stays pure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Euros per one US dollar
    pub usd_to_eur: BigDecimal,
    /// US dollars per one euro
    pub eur_to_usd: BigDecimal,
}

impl ExchangeRate {
    /// Create a rate pair
    pub fn new(usd_to_eur: BigDecimal, eur_to_usd: BigDecimal) -> Self {
        Self {
            usd_to_eur,
            eur_to_usd,
        }
    }

    /// Convert an amount between currencies. Identity when `from == to`.
    pub fn convert(&self, amount: &BigDecimal, from: Currency, to: Currency) -> BigDecimal {
        match (from, to) {
            (Currency::Usd, Currency::Eur) => amount * &self.usd_to_eur,
            (Currency::Eur, Currency::Usd) => amount * &self.eur_to_usd,
            _ => amount.clone(),
        }
    }

    /// Convert an amount into the base reporting currency
    pub fn to_base(&self, amount: &BigDecimal, from: Currency) -> BigDecimal {
        self.convert(amount, from, Currency::BASE)
    }
}

/// Kinds of money-responsible entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolderType {
    /// Physical cash box or a person carrying cash
    Cash,
    /// Bank account
    Bank,
    /// Payment card
    Card,
}

/// A money-responsible entity: cash box, bank account, or card.
///
/// Holders are never deleted, only deactivated, so historical transactions
/// always resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// What kind of money pool this is
    pub holder_type: HolderType,
    /// Currency the holder usually operates in
    pub currency: Currency,
    /// Inactive holders are kept for history but excluded from new activity
    pub active: bool,
}

impl Holder {
    /// Create a new active holder
    pub fn new(id: String, name: String, holder_type: HolderType, currency: Currency) -> Self {
        Self {
            id,
            name,
            holder_type,
            currency,
            active: true,
        }
    }
}

/// Transaction kind governing the balance effect.
///
/// Direction is encoded here, never in the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money coming in (booking payments, other income)
    In,
    /// Money going out (expenses)
    Out,
    /// Movement between two holders, same currency and amount on both sides
    Transfer,
    /// Conversion between the two currencies within one holder
    Exchange,
}

/// Lifecycle status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Expected but not yet settled; tracked separately from balances
    Pending,
    /// Settled; contributes to balances
    Confirmed,
    /// Cancelled; excluded from every aggregate, unconditionally
    Void,
}

/// How the money physically moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
}

impl PaymentMethod {
    /// Holder types this payment method is expected to land on
    pub fn expected_holder_types(&self) -> &'static [HolderType] {
        match self {
            PaymentMethod::Cash => &[HolderType::Cash],
            PaymentMethod::Card => &[HolderType::Card, HolderType::Bank],
            PaymentMethod::BankTransfer => &[HolderType::Bank],
        }
    }
}

/// Well-known category tags
pub mod categories {
    /// Category of the derived per-booking meals expense
    pub const BREAKFAST: &str = "breakfast";
}

/// An append-only ledger event.
///
/// After creation a transaction is only ever mutated to flip its status or to
/// attach a booking reference; amount and kind are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: String,
    /// Business date. Records without a date are excluded from date-filtered
    /// views and date-based rules instead of raising errors.
    pub date: Option<NaiveDate>,
    /// Balance effect of this transaction
    pub kind: TransactionKind,
    /// Lifecycle status
    pub status: TransactionStatus,
    /// Currency of `amount`
    pub currency: Currency,
    /// Always non-negative; direction lives in `kind`
    pub amount: BigDecimal,
    /// Booking this transaction settles, if known
    pub booking_id: Option<String>,
    /// Free-form category tag; `categories::BREAKFAST` is reserved for the
    /// derived meals expense
    pub category: Option<String>,
    /// How the money moved, when recorded
    pub payment_method: Option<PaymentMethod>,
    /// Holder answerable for this money
    pub responsible_holder: Option<String>,
    /// Source holder; required together with `to_holder` for transfers
    pub from_holder: Option<String>,
    /// Destination holder of a transfer
    pub to_holder: Option<String>,
    /// Conversion rate applied by an `Exchange` transaction. A missing rate
    /// converts as zero rather than failing the fold.
    pub exchange_rate: Option<BigDecimal>,
    /// True for transactions materialized by rule-based computation
    pub auto_generated: bool,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the record was created
    pub created_at: NaiveDateTime,
    /// When the record was last updated
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// Create a confirmed transaction with the given essentials
    pub fn new(
        id: String,
        date: Option<NaiveDate>,
        kind: TransactionKind,
        currency: Currency,
        amount: BigDecimal,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            date,
            kind,
            status: TransactionStatus::Confirmed,
            currency,
            amount,
            booking_id: None,
            category: None,
            payment_method: None,
            responsible_holder: None,
            from_holder: None,
            to_holder: None,
            exchange_rate: None,
            auto_generated: false,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this transaction is void and must be ignored by every aggregate
    pub fn is_void(&self) -> bool {
        self.status == TransactionStatus::Void
    }

    /// Whether this transaction has no booking attached
    pub fn is_loose(&self) -> bool {
        self.booking_id.is_none()
    }

    /// Whether the given holder is answerable for this transaction: either
    /// named as responsible, or the source holder when no responsible holder
    /// is set.
    pub fn is_responsibility_of(&self, holder_id: &str) -> bool {
        match &self.responsible_holder {
            Some(responsible) => responsible == holder_id,
            None => self.from_holder.as_deref() == Some(holder_id),
        }
    }

    /// Whether the holder appears on this transaction in any role
    pub fn touches_holder(&self, holder_id: &str) -> bool {
        self.responsible_holder.as_deref() == Some(holder_id)
            || self.from_holder.as_deref() == Some(holder_id)
            || self.to_holder.as_deref() == Some(holder_id)
    }

    /// Whether this transaction carries the given category tag
    pub fn has_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }

    /// Validate the record shape
    pub fn validate(&self) -> FinanceResult<()> {
        if self.id.trim().is_empty() {
            return Err(FinanceError::InvalidTransaction(
                "transaction id cannot be empty".to_string(),
            ));
        }

        if self.amount < BigDecimal::from(0) {
            return Err(FinanceError::InvalidTransaction(
                "amount must be non-negative; direction is carried by the kind".to_string(),
            ));
        }

        if self.kind == TransactionKind::Transfer
            && (self.from_holder.is_none() || self.to_holder.is_none())
        {
            return Err(FinanceError::InvalidTransaction(
                "transfer requires both a from-holder and a to-holder".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default adult count when the itinerary does not record one
pub const DEFAULT_ADULTS: u32 = 2;

/// One day of a booking's itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    /// Hotel the group sleeps in that night
    pub hotel: String,
    /// Guests staying that night, when recorded
    pub guests: Option<u32>,
}

/// Ordered itinerary of a booking plus group-level metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Itinerary {
    /// Day entries in tour order
    pub days: Vec<ItineraryDay>,
    /// Adults in the group; `DEFAULT_ADULTS` when absent
    pub adults: Option<u32>,
}

/// A confirmed tour reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: String,
    /// Short human-facing booking code
    pub code: String,
    /// Client the tour is booked for
    pub client: String,
    /// Arrival date
    pub arrival: NaiveDate,
    /// Tour length in days
    pub days: u32,
    /// Expected revenue. Bookings priced at zero or below are excluded from
    /// financial rollups and matcher candidacy.
    pub price: BigDecimal,
    /// Day-by-day plan
    pub itinerary: Itinerary,
}

impl Booking {
    /// Create a booking with an empty itinerary
    pub fn new(
        id: String,
        code: String,
        client: String,
        arrival: NaiveDate,
        days: u32,
        price: BigDecimal,
    ) -> Self {
        Self {
            id,
            code,
            client,
            arrival,
            days,
            price,
            itinerary: Itinerary::default(),
        }
    }

    /// Adults in the group, defaulted when the itinerary does not say
    pub fn adults(&self) -> u32 {
        self.itinerary.adults.unwrap_or(DEFAULT_ADULTS)
    }
}

/// A standalone expense recorded against a booking outside the transaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier
    pub id: String,
    /// Booking the expense belongs to
    pub booking_id: String,
    /// Date of the expense, when known
    pub date: Option<NaiveDate>,
    /// What was paid for
    pub description: String,
    /// Always non-negative
    pub amount: BigDecimal,
    /// Currency of `amount`
    pub currency: Currency,
}

/// Errors that can occur in the finance system
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("booking not found: {0}")]
    BookingNotFound(String),
    #[error("holder not found: {0}")]
    HolderNotFound(String),
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type for finance operations
pub type FinanceResult<T> = Result<T, FinanceError>;
