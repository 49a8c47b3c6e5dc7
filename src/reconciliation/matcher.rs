//! Booking proposals for transactions that arrived without one

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Arrival-date window for candidate bookings, days either side, inclusive
pub const MATCH_WINDOW_DAYS: i64 = 3;

/// Suggestions at or below this confidence are suppressed
pub const MIN_CONFIDENCE: u8 = 50;

/// A proposed booking attachment for a loose transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSuggestion {
    /// The loose transaction
    pub transaction_id: String,
    /// The booking proposed for it
    pub booking_id: String,
    /// 0 to 100
    pub confidence: u8,
}

/// Score one booking candidate against a loose transaction.
///
/// Price closeness weighs 70, date closeness 30; the result is rounded and
/// clamped to 0..=100. Confidence is a ranking signal, not money, so the
/// arithmetic runs on floats.
fn confidence_for(amount: f64, price: f64, days_diff: i64) -> u8 {
    let price_match = (price - amount).abs() / price;
    let date_score = 1.0 - days_diff as f64 / MATCH_WINDOW_DAYS as f64;
    let raw = (1.0 - price_match) * 70.0 + date_score * 30.0;
    raw.round().clamp(0.0, 100.0) as u8
}

/// Best booking proposal for one loose transaction, if any candidate is
/// convincing enough.
///
/// Bookings priced at zero or below are never candidates; a transaction with
/// no date has no candidates. On an exact confidence tie the first candidate
/// encountered wins (kept for compatibility with how operators see the list).
pub fn suggest_booking(txn: &Transaction, bookings: &[Booking]) -> Option<MatchSuggestion> {
    if txn.is_void() || !txn.is_loose() {
        return None;
    }
    let date = txn.date?;
    let amount = txn.amount.to_f64()?;

    let mut best: Option<(u8, &Booking)> = None;
    for booking in bookings {
        if booking.price <= BigDecimal::from(0) {
            continue;
        }
        let days_diff = (booking.arrival - date).num_days().abs();
        if days_diff > MATCH_WINDOW_DAYS {
            continue;
        }
        let Some(price) = booking.price.to_f64() else {
            continue;
        };

        let confidence = confidence_for(amount, price, days_diff);
        if best.map_or(true, |(current, _)| confidence > current) {
            best = Some((confidence, booking));
        }
    }

    best.and_then(|(confidence, booking)| {
        (confidence > MIN_CONFIDENCE).then(|| MatchSuggestion {
            transaction_id: txn.id.clone(),
            booking_id: booking.id.clone(),
            confidence,
        })
    })
}

/// Suggestions for every loose transaction in the snapshot
pub fn suggest_for_loose(
    transactions: &[Transaction],
    bookings: &[Booking],
) -> Vec<MatchSuggestion> {
    transactions
        .iter()
        .filter(|txn| !txn.is_void() && txn.is_loose())
        .filter_map(|txn| suggest_booking(txn, bookings))
        .collect()
}
