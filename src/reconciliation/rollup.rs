//! Per-booking financial rollup and payment-status classification

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Policy for the derived meals expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealsPolicy {
    /// Flat breakfast rate charged per pair of adults per qualifying night
    pub rate_per_pair: BigDecimal,
    /// Hotel-name fragments whose stays carry a breakfast cost
    pub hotel_allow_list: Vec<String>,
}

impl Default for MealsPolicy {
    fn default() -> Self {
        Self {
            rate_per_pair: BigDecimal::from(15),
            hotel_allow_list: vec![
                "guesthouse".to_string(),
                "panorama".to_string(),
                "lodge".to_string(),
            ],
        }
    }
}

/// Payment status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Nothing outstanding
    Paid,
    /// Some money received, some outstanding
    Partial,
    /// Nothing received yet
    Unpaid,
}

/// Derived financial view of one booking.
///
/// Recomputed from the transaction snapshot on every query; never persisted.
/// Cross-currency sums are converted into the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingFinancials {
    /// Booking this row describes
    pub booking_id: String,
    /// Human-facing booking code
    pub code: String,
    /// Expected revenue (the booking price)
    pub revenue: BigDecimal,
    /// Confirmed incoming payments, base currency
    pub received: BigDecimal,
    /// Confirmed outgoings plus standalone expenses plus meals, base currency
    pub expenses: BigDecimal,
    /// Effective meals expense: the breakfast transaction's amount when one
    /// exists, the computed value otherwise
    pub meals_expense: BigDecimal,
    /// Revenue minus received
    pub remaining: BigDecimal,
    /// Revenue minus expenses
    pub net: BigDecimal,
    /// Classification derived from remaining/received
    pub status: PaymentStatus,
    /// Any associated transaction is still pending
    pub has_pending: bool,
    /// Net is below zero
    pub has_negative_net: bool,
}

/// Itinerary days whose hotel matches the allow-list, case-insensitive
pub fn qualifying_nights(booking: &Booking, policy: &MealsPolicy) -> u32 {
    booking
        .itinerary
        .days
        .iter()
        .filter(|day| {
            let hotel = day.hotel.to_lowercase();
            policy
                .hotel_allow_list
                .iter()
                .any(|fragment| hotel.contains(&fragment.to_lowercase()))
        })
        .count() as u32
}

/// Rule-based meals expense: one breakfast pair-rate per pair of adults
/// (rounded up) per qualifying night.
pub fn meals_expense(booking: &Booking, policy: &MealsPolicy) -> BigDecimal {
    let nights = qualifying_nights(booking, policy);
    let pairs = booking.adults().div_ceil(2);
    &policy.rate_per_pair * BigDecimal::from(pairs * nights)
}

/// Fold a booking's transactions and standalone expenses into its financial
/// row. Returns `None` for bookings priced at zero or below; they carry no
/// financial meaning and are excluded rather than treated as errors.
pub fn rollup_booking(
    booking: &Booking,
    transactions: &[Transaction],
    expense_records: &[ExpenseRecord],
    rate: &ExchangeRate,
    policy: &MealsPolicy,
) -> Option<BookingFinancials> {
    let zero = BigDecimal::from(0);
    if booking.price <= zero {
        return None;
    }

    let mut received = zero.clone();
    let mut out_total = zero.clone();
    let mut breakfast: Option<BigDecimal> = None;
    let mut has_pending = false;

    for txn in transactions {
        if txn.is_void() || txn.booking_id.as_deref() != Some(booking.id.as_str()) {
            continue;
        }

        if txn.status == TransactionStatus::Pending {
            has_pending = true;
        }
        if txn.status != TransactionStatus::Confirmed {
            continue;
        }

        match txn.kind {
            TransactionKind::In => {
                received += rate.to_base(&txn.amount, txn.currency);
            }
            TransactionKind::Out => {
                let base_amount = rate.to_base(&txn.amount, txn.currency);
                if txn.has_category(categories::BREAKFAST) && breakfast.is_none() {
                    breakfast = Some(base_amount.clone());
                }
                out_total += base_amount;
            }
            // Transfers and exchanges move money between pools without
            // changing what the booking earned or cost.
            TransactionKind::Transfer | TransactionKind::Exchange => {}
        }
    }

    let standalone: BigDecimal = expense_records
        .iter()
        .filter(|record| record.booking_id == booking.id)
        .map(|record| rate.to_base(&record.amount, record.currency))
        .sum();

    // An existing breakfast transaction is already inside out_total, so the
    // computed value is only added when no such transaction exists.
    let (meals, expenses) = match breakfast {
        Some(actual) => (actual, &out_total + &standalone),
        None => {
            let computed = meals_expense(booking, policy);
            (computed.clone(), &out_total + &standalone + &computed)
        }
    };

    let remaining = &booking.price - &received;
    let net = &booking.price - &expenses;
    let status = if remaining <= zero {
        PaymentStatus::Paid
    } else if received > zero {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    };
    let has_negative_net = net < zero;

    Some(BookingFinancials {
        booking_id: booking.id.clone(),
        code: booking.code.clone(),
        revenue: booking.price.clone(),
        received,
        expenses,
        meals_expense: meals,
        remaining,
        net,
        status,
        has_pending,
        has_negative_net,
    })
}
