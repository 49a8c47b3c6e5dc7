//! Integration tests for tour-finance-core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tour_finance_core::{
    patterns, Alert, AlertKind, Booking, Currency, ExchangeRate, FinanceBoard, Holder, HolderType,
    ItineraryDay, MemoryStorage, PaymentMethod, PaymentStatus, Transaction, TransactionKind,
    TransactionStatus,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn seeded_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();

    storage.add_holder(Holder::new(
        "safe".to_string(),
        "Office safe".to_string(),
        HolderType::Cash,
        Currency::Usd,
    ));
    storage.add_holder(Holder::new(
        "bank".to_string(),
        "Company account".to_string(),
        HolderType::Bank,
        Currency::Usd,
    ));

    let mut booking = Booking::new(
        "b1".to_string(),
        "T-001".to_string(),
        "Smith party".to_string(),
        date(8, 10),
        4,
        BigDecimal::from(2000),
    );
    booking.itinerary.adults = Some(3);
    booking.itinerary.days = vec![
        ItineraryDay {
            hotel: "Panorama Hotel".to_string(),
            guests: Some(3),
        },
        ItineraryDay {
            hotel: "Old Town Guesthouse".to_string(),
            guests: Some(3),
        },
        ItineraryDay {
            hotel: "Mountain camp".to_string(),
            guests: Some(3),
        },
    ];
    storage.add_booking(booking);

    storage.set_exchange_rate(ExchangeRate::new(
        "0.9".parse().unwrap(),
        "1.1".parse().unwrap(),
    ));

    storage
}

#[tokio::test]
async fn season_workflow_from_payment_to_rollup() {
    let storage = seeded_storage();
    let mut board = FinanceBoard::new(storage.clone());

    // Client pays a deposit in cash.
    let deposit = patterns::booking_payment(
        "pay-1".to_string(),
        date(8, 1),
        "b1".to_string(),
        "safe".to_string(),
        Currency::Usd,
        BigDecimal::from(800),
        PaymentMethod::Cash,
    )
    .unwrap();
    board.record_transaction(deposit).await.unwrap();

    let row = board.booking_row("b1").await.unwrap().unwrap();
    assert_eq!(row.status, PaymentStatus::Partial);
    assert_eq!(row.remaining, BigDecimal::from(1200));

    // The rest arrives by bank transfer.
    let balance_payment = patterns::booking_payment(
        "pay-2".to_string(),
        date(8, 9),
        "b1".to_string(),
        "bank".to_string(),
        Currency::Usd,
        BigDecimal::from(1200),
        PaymentMethod::BankTransfer,
    )
    .unwrap();
    board.record_transaction(balance_payment).await.unwrap();

    let row = board.booking_row("b1").await.unwrap().unwrap();
    assert_eq!(row.status, PaymentStatus::Paid);
    assert_eq!(row.received, BigDecimal::from(2000));

    // Derived meals: ceil(3/2) = 2 pairs, 2 qualifying nights, 15 per pair.
    let created = board.materialize_meal_expenses().await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].amount, BigDecimal::from(60));

    // A second sweep materializes nothing new.
    assert!(board.materialize_meal_expenses().await.unwrap().is_empty());

    let row = board.booking_row("b1").await.unwrap().unwrap();
    assert_eq!(row.meals_expense, BigDecimal::from(60));
    assert_eq!(row.expenses, BigDecimal::from(60));
    assert_eq!(row.net, BigDecimal::from(1940));

    // Holder balances reflect where the money physically sits.
    let safe = board.holder_balance("safe").await.unwrap();
    assert_eq!(safe.confirmed_in(Currency::Usd), BigDecimal::from(800));
    let bank = board.holder_balance("bank").await.unwrap();
    assert_eq!(bank.confirmed_in(Currency::Usd), BigDecimal::from(1200));
}

#[tokio::test]
async fn transfers_and_exchanges_redistribute_without_creating_value() {
    let storage = seeded_storage();
    let mut board = FinanceBoard::new(storage.clone());

    let income = patterns::booking_payment(
        "pay-1".to_string(),
        date(8, 1),
        "b1".to_string(),
        "safe".to_string(),
        Currency::Usd,
        BigDecimal::from(1000),
        PaymentMethod::Cash,
    )
    .unwrap();
    board.record_transaction(income).await.unwrap();

    let move_to_bank = patterns::transfer(
        "tr-1".to_string(),
        date(8, 2),
        "safe".to_string(),
        "bank".to_string(),
        Currency::Usd,
        BigDecimal::from(400),
    )
    .unwrap();
    board.record_transaction(move_to_bank).await.unwrap();

    let swap = patterns::exchange(
        "ex-1".to_string(),
        date(8, 3),
        "safe".to_string(),
        Currency::Usd,
        BigDecimal::from(100),
        "0.9".parse().unwrap(),
    )
    .unwrap();
    board.record_transaction(swap).await.unwrap();

    let balances = board.holder_balances().await.unwrap();
    let rate = ExchangeRate::new(BigDecimal::from(1), BigDecimal::from(1));

    // Conservation at par: 1000 came in, transfers and the exchange only
    // moved it around (the exchange left 90 EUR valued 1:1 here).
    let total: BigDecimal = balances.iter().map(|b| b.display_total(&rate)).sum();
    assert_eq!(total, "990.0".parse::<BigDecimal>().unwrap());

    let safe = board.holder_balance("safe").await.unwrap();
    assert_eq!(safe.confirmed_in(Currency::Usd), BigDecimal::from(500));
    assert_eq!(
        safe.confirmed_in(Currency::Eur),
        "90.0".parse::<BigDecimal>().unwrap()
    );
}

#[tokio::test]
async fn loose_payment_is_matched_then_attached() {
    let storage = seeded_storage();
    let mut board = FinanceBoard::new(storage.clone());

    let mut loose = Transaction::new(
        "loose-1".to_string(),
        Some(date(8, 11)),
        TransactionKind::In,
        Currency::Usd,
        BigDecimal::from(2000),
    );
    loose.responsible_holder = Some("bank".to_string());
    loose.payment_method = Some(PaymentMethod::BankTransfer);
    board.record_transaction(loose).await.unwrap();

    let suggestions = board.loose_suggestions().await.unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].booking_id, "b1");
    assert!(suggestions[0].confidence > 50);

    board
        .attach_booking("loose-1", &suggestions[0].booking_id)
        .await
        .unwrap();

    let row = board.booking_row("b1").await.unwrap().unwrap();
    assert_eq!(row.status, PaymentStatus::Paid);
    assert!(board.loose_suggestions().await.unwrap().is_empty());
}

#[tokio::test]
async fn alert_scan_surfaces_operational_anomalies() {
    let storage = seeded_storage();
    let mut board = FinanceBoard::new(storage.clone());

    // Card payment recorded on the cash safe.
    let mismatched = patterns::booking_payment(
        "pay-1".to_string(),
        date(8, 1),
        "b1".to_string(),
        "safe".to_string(),
        Currency::Usd,
        BigDecimal::from(5000),
        PaymentMethod::Card,
    )
    .unwrap();
    board.record_transaction(mismatched).await.unwrap();

    // A pending expense left sitting for weeks.
    let mut stale = patterns::expense(
        "exp-1".to_string(),
        date(8, 1),
        "bank".to_string(),
        Currency::Usd,
        BigDecimal::from(120),
        None,
    )
    .unwrap();
    stale.status = TransactionStatus::Pending;
    board.record_transaction(stale).await.unwrap();

    let alerts: Vec<Alert> = board.scan_alerts(date(8, 25)).await.unwrap();
    let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();

    assert!(kinds.contains(&AlertKind::HolderMismatch));
    assert!(kinds.contains(&AlertKind::StalePending));
    // The safe took 5000 on Aug 1 and nothing has moved since.
    assert!(kinds.contains(&AlertKind::IdleCash));
}

#[tokio::test]
async fn financial_rows_serialize_for_the_dashboard() {
    let storage = seeded_storage();
    let board = FinanceBoard::new(storage.clone());

    let row = board.booking_row("b1").await.unwrap().unwrap();
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["booking_id"], "b1");
    assert_eq!(json["status"], "Unpaid");
}
