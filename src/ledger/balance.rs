//! Per-holder balance aggregation
//!
//! Balances are folded from the full non-void transaction set on every query.
//! Nothing is cached or incrementally maintained; the fold is pure and
//! order-independent.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Snapshot of one holder's cash position, per currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderBalance {
    /// Holder this snapshot belongs to
    pub holder_id: String,
    /// Confirmed balance per currency
    pub confirmed: HashMap<Currency, BigDecimal>,
    /// Pending incoming amounts per currency
    pub pending_in: HashMap<Currency, BigDecimal>,
    /// Pending outgoing amounts per currency
    pub pending_out: HashMap<Currency, BigDecimal>,
    /// Most recent business date of any transaction touching the holder
    pub last_activity: Option<NaiveDate>,
}

impl HolderBalance {
    fn new(holder_id: String) -> Self {
        Self {
            holder_id,
            confirmed: HashMap::new(),
            pending_in: HashMap::new(),
            pending_out: HashMap::new(),
            last_activity: None,
        }
    }

    /// Confirmed balance in one currency, zero when untouched
    pub fn confirmed_in(&self, currency: Currency) -> BigDecimal {
        amount_in(&self.confirmed, currency)
    }

    /// Pending incoming total in one currency
    pub fn pending_in_for(&self, currency: Currency) -> BigDecimal {
        amount_in(&self.pending_in, currency)
    }

    /// Pending outgoing total in one currency
    pub fn pending_out_for(&self, currency: Currency) -> BigDecimal {
        amount_in(&self.pending_out, currency)
    }

    /// Coarse single-number figure: confirmed balances converted into the base
    /// currency. For display only; classification always works per currency.
    pub fn display_total(&self, rate: &ExchangeRate) -> BigDecimal {
        self.confirmed
            .iter()
            .map(|(currency, amount)| rate.to_base(amount, *currency))
            .sum()
    }
}

fn amount_in(map: &HashMap<Currency, BigDecimal>, currency: Currency) -> BigDecimal {
    map.get(&currency)
        .cloned()
        .unwrap_or_else(|| BigDecimal::from(0))
}

fn credit(map: &mut HashMap<Currency, BigDecimal>, currency: Currency, amount: &BigDecimal) {
    let entry = map
        .entry(currency)
        .or_insert_with(|| BigDecimal::from(0));
    *entry += amount;
}

fn debit(map: &mut HashMap<Currency, BigDecimal>, currency: Currency, amount: &BigDecimal) {
    let entry = map
        .entry(currency)
        .or_insert_with(|| BigDecimal::from(0));
    *entry -= amount;
}

/// Fold the transaction set into one holder's balance snapshot.
///
/// Void transactions are skipped even if the caller passes them in; the store
/// already filters them, this keeps the invariant local.
pub fn balance_for_holder(holder: &Holder, transactions: &[Transaction]) -> HolderBalance {
    let mut balance = HolderBalance::new(holder.id.clone());

    for txn in transactions {
        if txn.is_void() {
            continue;
        }

        if txn.touches_holder(&holder.id) {
            if let Some(date) = txn.date {
                balance.last_activity = Some(match balance.last_activity {
                    Some(current) => current.max(date),
                    None => date,
                });
            }
        }

        match txn.kind {
            TransactionKind::In => {
                if txn.is_responsibility_of(&holder.id) {
                    match txn.status {
                        TransactionStatus::Confirmed => {
                            credit(&mut balance.confirmed, txn.currency, &txn.amount)
                        }
                        TransactionStatus::Pending => {
                            credit(&mut balance.pending_in, txn.currency, &txn.amount)
                        }
                        TransactionStatus::Void => {}
                    }
                }
            }
            TransactionKind::Out => {
                if txn.is_responsibility_of(&holder.id) {
                    match txn.status {
                        TransactionStatus::Confirmed => {
                            debit(&mut balance.confirmed, txn.currency, &txn.amount)
                        }
                        TransactionStatus::Pending => {
                            credit(&mut balance.pending_out, txn.currency, &txn.amount)
                        }
                        TransactionStatus::Void => {}
                    }
                }
            }
            TransactionKind::Transfer => {
                // Pending transfers have no balance effect on either side.
                if txn.status == TransactionStatus::Confirmed {
                    if txn.from_holder.as_deref() == Some(holder.id.as_str()) {
                        debit(&mut balance.confirmed, txn.currency, &txn.amount);
                    }
                    if txn.to_holder.as_deref() == Some(holder.id.as_str()) {
                        credit(&mut balance.confirmed, txn.currency, &txn.amount);
                    }
                }
            }
            TransactionKind::Exchange => {
                if txn.is_responsibility_of(&holder.id)
                    && txn.status == TransactionStatus::Confirmed
                {
                    let rate = txn
                        .exchange_rate
                        .clone()
                        .unwrap_or_else(|| BigDecimal::from(0));
                    if rate == BigDecimal::from(0) {
                        tracing::warn!(
                            transaction = %txn.id,
                            "exchange has no usable rate, credit side converts to zero"
                        );
                    }
                    debit(&mut balance.confirmed, txn.currency, &txn.amount);
                    credit(
                        &mut balance.confirmed,
                        txn.currency.other(),
                        &(&txn.amount * &rate),
                    );
                }
            }
        }
    }

    balance
}

/// Balance snapshots for a set of holders over one shared transaction snapshot
pub fn balances_for_holders(
    holders: &[Holder],
    transactions: &[Transaction],
) -> Vec<HolderBalance> {
    holders
        .iter()
        .map(|holder| balance_for_holder(holder, transactions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn holder(id: &str) -> Holder {
        Holder::new(
            id.to_string(),
            id.to_string(),
            HolderType::Cash,
            Currency::Usd,
        )
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn txn(id: &str, kind: TransactionKind, amount: i64) -> Transaction {
        let mut t = Transaction::new(
            id.to_string(),
            Some(date(1)),
            kind,
            Currency::Usd,
            BigDecimal::from(amount),
        );
        t.responsible_holder = Some("safe".to_string());
        t
    }

    #[test]
    fn confirmed_in_and_out_fold_into_balance() {
        let mut out = txn("t2", TransactionKind::Out, 300);
        out.date = Some(date(3));
        let txns = vec![txn("t1", TransactionKind::In, 1000), out];

        let balance = balance_for_holder(&holder("safe"), &txns);
        assert_eq!(balance.confirmed_in(Currency::Usd), BigDecimal::from(700));
        assert_eq!(balance.confirmed_in(Currency::Eur), BigDecimal::from(0));
        assert_eq!(balance.last_activity, Some(date(3)));
    }

    #[test]
    fn pending_amounts_stay_out_of_the_confirmed_balance() {
        let mut pending_in = txn("t1", TransactionKind::In, 500);
        pending_in.status = TransactionStatus::Pending;
        let mut pending_out = txn("t2", TransactionKind::Out, 200);
        pending_out.status = TransactionStatus::Pending;

        let balance = balance_for_holder(&holder("safe"), &[pending_in, pending_out]);
        assert_eq!(balance.confirmed_in(Currency::Usd), BigDecimal::from(0));
        assert_eq!(balance.pending_in_for(Currency::Usd), BigDecimal::from(500));
        assert_eq!(balance.pending_out_for(Currency::Usd), BigDecimal::from(200));
    }

    #[test]
    fn transfer_debits_source_and_credits_destination() {
        let mut transfer = Transaction::new(
            "t1".to_string(),
            Some(date(2)),
            TransactionKind::Transfer,
            Currency::Usd,
            BigDecimal::from(400),
        );
        transfer.from_holder = Some("safe".to_string());
        transfer.to_holder = Some("bank".to_string());
        let txns = vec![transfer];

        let from = balance_for_holder(&holder("safe"), &txns);
        let to = balance_for_holder(&holder("bank"), &txns);
        assert_eq!(from.confirmed_in(Currency::Usd), BigDecimal::from(-400));
        assert_eq!(to.confirmed_in(Currency::Usd), BigDecimal::from(400));
        assert_eq!(to.last_activity, Some(date(2)));
    }

    #[test]
    fn pending_transfer_has_no_balance_effect() {
        let mut transfer = Transaction::new(
            "t1".to_string(),
            Some(date(2)),
            TransactionKind::Transfer,
            Currency::Usd,
            BigDecimal::from(400),
        );
        transfer.from_holder = Some("safe".to_string());
        transfer.to_holder = Some("bank".to_string());
        transfer.status = TransactionStatus::Pending;
        let txns = vec![transfer];

        let from = balance_for_holder(&holder("safe"), &txns);
        assert_eq!(from.confirmed_in(Currency::Usd), BigDecimal::from(0));
        assert!(from.pending_out.is_empty());
        // Still counts as activity.
        assert_eq!(from.last_activity, Some(date(2)));
    }

    #[test]
    fn exchange_moves_value_between_currencies() {
        let mut exchange = txn("t1", TransactionKind::Exchange, 100);
        exchange.exchange_rate = Some("0.9".parse().unwrap());

        let balance = balance_for_holder(&holder("safe"), &[exchange]);
        assert_eq!(balance.confirmed_in(Currency::Usd), BigDecimal::from(-100));
        assert_eq!(
            balance.confirmed_in(Currency::Eur),
            "90.0".parse::<BigDecimal>().unwrap()
        );
    }

    #[test]
    fn exchange_without_rate_credits_zero() {
        let exchange = txn("t1", TransactionKind::Exchange, 100);

        let balance = balance_for_holder(&holder("safe"), &[exchange]);
        assert_eq!(balance.confirmed_in(Currency::Usd), BigDecimal::from(-100));
        assert_eq!(balance.confirmed_in(Currency::Eur), BigDecimal::from(0));
    }

    #[test]
    fn void_transactions_change_nothing() {
        let txns = vec![txn("t1", TransactionKind::In, 1000)];
        let before = balance_for_holder(&holder("safe"), &txns);

        let mut with_void = txns.clone();
        let mut void = txn("t2", TransactionKind::Out, 999);
        void.status = TransactionStatus::Void;
        with_void.push(void);

        let after = balance_for_holder(&holder("safe"), &with_void);
        assert_eq!(before, after);
    }

    #[test]
    fn fold_is_order_independent() {
        let mut a = txn("t1", TransactionKind::In, 1000);
        a.date = Some(date(5));
        let b = txn("t2", TransactionKind::Out, 300);
        let mut c = txn("t3", TransactionKind::In, 250);
        c.currency = Currency::Eur;
        c.date = Some(date(9));

        let forward = vec![a.clone(), b.clone(), c.clone()];
        let backward = vec![c, b, a];

        assert_eq!(
            balance_for_holder(&holder("safe"), &forward),
            balance_for_holder(&holder("safe"), &backward)
        );
    }

    #[test]
    fn responsibility_fallback_uses_from_holder() {
        let mut t = Transaction::new(
            "t1".to_string(),
            Some(date(1)),
            TransactionKind::Out,
            Currency::Usd,
            BigDecimal::from(50),
        );
        t.from_holder = Some("guide".to_string());

        let balance = balance_for_holder(&holder("guide"), &[t]);
        assert_eq!(balance.confirmed_in(Currency::Usd), BigDecimal::from(-50));
    }

    #[test]
    fn display_total_converts_to_base_currency() {
        let mut usd = txn("t1", TransactionKind::In, 100);
        usd.currency = Currency::Usd;
        let mut eur = txn("t2", TransactionKind::In, 100);
        eur.currency = Currency::Eur;

        let balance = balance_for_holder(&holder("safe"), &[usd, eur]);
        let rate = ExchangeRate::new("0.5".parse().unwrap(), "2".parse().unwrap());
        assert_eq!(balance.display_total(&rate), BigDecimal::from(300));
    }
}
