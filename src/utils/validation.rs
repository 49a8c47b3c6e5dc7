//! Validation utilities

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate that an amount is non-negative
pub fn validate_non_negative(amount: &BigDecimal) -> FinanceResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(FinanceError::Validation(
            "amount must be non-negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a record identifier is usable
pub fn validate_record_id(id: &str) -> FinanceResult<()> {
    if id.trim().is_empty() {
        return Err(FinanceError::Validation("id cannot be empty".to_string()));
    }

    if id.len() > 64 {
        return Err(FinanceError::Validation(
            "id cannot exceed 64 characters".to_string(),
        ));
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(FinanceError::Validation(
            "id can only contain alphanumeric characters, dashes, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Full entry-time validation applied before a transaction is appended to
/// the log.
pub fn validate_new_transaction(txn: &Transaction) -> FinanceResult<()> {
    validate_record_id(&txn.id)?;
    txn.validate()?;

    if txn.kind == TransactionKind::Exchange && txn.exchange_rate.is_none() {
        tracing::warn!(
            transaction = %txn.id,
            "exchange recorded without a rate; its credit side will convert to zero"
        );
    }

    Ok(())
}
