//! Anomaly scan over holders and transactions
//!
//! Each rule is independent and order-insensitive; the scan is a pure pass
//! over an already-fetched snapshot.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::balance::balance_for_holder;
use crate::types::*;

/// Thresholds for the anomaly rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPolicy {
    /// Days a pending transaction may sit before it counts as stale
    pub stale_pending_days: i64,
    /// Confirmed cash balance above which unused money is flagged
    pub idle_cash_threshold: BigDecimal,
    /// Days without activity before cash counts as idle
    pub idle_days: i64,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            stale_pending_days: 7,
            idle_cash_threshold: BigDecimal::from(1000),
            idle_days: 7,
        }
    }
}

/// How urgent an alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// What kind of anomaly was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// Payment method landed on an unexpected holder type
    HolderMismatch,
    /// Confirmed balance below zero in some currency
    NegativeBalance,
    /// Pending transaction older than the policy allows
    StalePending,
    /// Cash sitting unused above the threshold
    IdleCash,
}

/// A single anomaly, referencing the records it concerns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
    /// Holder the alert concerns, when one does
    pub holder_id: Option<String>,
    /// Transaction the alert concerns, when one does
    pub transaction_id: Option<String>,
}

/// Run every rule over the snapshot
pub fn scan(
    holders: &[Holder],
    transactions: &[Transaction],
    today: NaiveDate,
    policy: &AlertPolicy,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    alerts.extend(holder_mismatches(holders, transactions));
    alerts.extend(negative_balances(holders, transactions));
    alerts.extend(stale_pending(transactions, today, policy));
    alerts.extend(idle_cash(holders, transactions, today, policy));
    alerts
}

/// Non-transfer transactions whose payment method does not fit the holder
/// type it actually landed on.
fn holder_mismatches(holders: &[Holder], transactions: &[Transaction]) -> Vec<Alert> {
    transactions
        .iter()
        .filter(|txn| !txn.is_void() && txn.kind != TransactionKind::Transfer)
        .filter_map(|txn| {
            let method = txn.payment_method?;
            let holder = holders.iter().find(|h| txn.is_responsibility_of(&h.id))?;
            if method.expected_holder_types().contains(&holder.holder_type) {
                return None;
            }
            Some(Alert {
                kind: AlertKind::HolderMismatch,
                severity: Severity::Warning,
                message: format!(
                    "{:?} payment recorded on {} ({:?} holder)",
                    method, holder.name, holder.holder_type
                ),
                holder_id: Some(holder.id.clone()),
                transaction_id: Some(txn.id.clone()),
            })
        })
        .collect()
}

/// Holders whose confirmed balance dips below zero in any currency
fn negative_balances(holders: &[Holder], transactions: &[Transaction]) -> Vec<Alert> {
    let zero = BigDecimal::from(0);
    let mut alerts = Vec::new();
    for holder in holders {
        let balance = balance_for_holder(holder, transactions);
        for (currency, amount) in &balance.confirmed {
            if *amount < zero {
                alerts.push(Alert {
                    kind: AlertKind::NegativeBalance,
                    severity: Severity::Critical,
                    message: format!(
                        "{} confirmed balance is {}",
                        holder.name,
                        format_amount(amount, *currency)
                    ),
                    holder_id: Some(holder.id.clone()),
                    transaction_id: None,
                });
            }
        }
    }
    alerts
}

/// Pending transactions older than the policy allows. Undated records cannot
/// age and are skipped.
fn stale_pending(
    transactions: &[Transaction],
    today: NaiveDate,
    policy: &AlertPolicy,
) -> Vec<Alert> {
    transactions
        .iter()
        .filter(|txn| txn.status == TransactionStatus::Pending)
        .filter_map(|txn| {
            let date = txn.date?;
            let age = (today - date).num_days();
            if age <= policy.stale_pending_days {
                return None;
            }
            Some(Alert {
                kind: AlertKind::StalePending,
                severity: Severity::Warning,
                message: format!(
                    "{} of {} pending for {} days",
                    format_amount(&txn.amount, txn.currency),
                    txn.id,
                    age
                ),
                holder_id: txn.responsible_holder.clone(),
                transaction_id: Some(txn.id.clone()),
            })
        })
        .collect()
}

/// Cash holders sitting on more than the threshold with no recent activity
fn idle_cash(
    holders: &[Holder],
    transactions: &[Transaction],
    today: NaiveDate,
    policy: &AlertPolicy,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for holder in holders {
        if holder.holder_type != HolderType::Cash {
            continue;
        }
        let balance = balance_for_holder(holder, transactions);
        let idle = balance
            .last_activity
            .map_or(true, |last| (today - last).num_days() > policy.idle_days);
        if !idle {
            continue;
        }
        for (currency, amount) in &balance.confirmed {
            if *amount > policy.idle_cash_threshold {
                alerts.push(Alert {
                    kind: AlertKind::IdleCash,
                    severity: Severity::Info,
                    message: format!(
                        "{} holds {} with no movement for over {} days",
                        holder.name,
                        format_amount(amount, *currency),
                        policy.idle_days
                    ),
                    holder_id: Some(holder.id.clone()),
                    transaction_id: None,
                });
            }
        }
    }
    alerts
}
