//! End-to-end booking season example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tour_finance_core::utils::MemoryStorage;
use tour_finance_core::{
    format_amount, patterns, Booking, Currency, ExchangeRate, FinanceBoard, Holder, HolderType,
    ItineraryDay, PaymentMethod,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏔️ Tour Finance Core - Booking Season Example\n");

    // Seed the store the dashboard would normally provide.
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
    storage.set_exchange_rate(ExchangeRate::new(
        "0.9".parse().unwrap(),
        "1.1".parse().unwrap(),
    ));

    let mut booking = Booking::new(
        "b1".to_string(),
        "T-001".to_string(),
        "Smith party".to_string(),
        NaiveDate::from_ymd_opt(2024, 8, 10).unwrap(),
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

    let mut board = FinanceBoard::new(storage.clone());

    // 1. Record the client's payments
    println!("💰 Recording payments...");
    let deposit = patterns::booking_payment(
        "pay-1".to_string(),
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        "b1".to_string(),
        "safe".to_string(),
        Currency::Usd,
        BigDecimal::from(800),
        PaymentMethod::Cash,
    )?;
    board.record_transaction(deposit).await?;
    println!("  ✓ Deposit of $800 into the safe");

    let rest = patterns::booking_payment(
        "pay-2".to_string(),
        NaiveDate::from_ymd_opt(2024, 8, 9).unwrap(),
        "b1".to_string(),
        "bank".to_string(),
        Currency::Usd,
        BigDecimal::from(1200),
        PaymentMethod::BankTransfer,
    )?;
    board.record_transaction(rest).await?;
    println!("  ✓ Balance of $1,200 by bank transfer\n");

    // 2. Materialize the derived meal expenses
    println!("🥐 Materializing meal expenses...");
    for txn in board.materialize_meal_expenses().await? {
        println!(
            "  ✓ Breakfast cost {} generated for booking {}",
            format_amount(&txn.amount, txn.currency),
            txn.booking_id.as_deref().unwrap_or("-")
        );
    }
    println!();

    // 3. Read the financial rows back
    println!("📈 Booking financials:");
    for row in board.booking_rows().await? {
        println!(
            "  {} — revenue {}, received {}, expenses {}, net {} ({:?})",
            row.code,
            format_amount(&row.revenue, Currency::BASE),
            format_amount(&row.received, Currency::BASE),
            format_amount(&row.expenses, Currency::BASE),
            format_amount(&row.net, Currency::BASE),
            row.status,
        );
    }
    println!();

    // 4. Where the money sits
    println!("🏦 Holder balances:");
    for balance in board.holder_balances().await? {
        println!(
            "  {}: {} confirmed",
            balance.holder_id,
            format_amount(&balance.confirmed_in(Currency::Usd), Currency::Usd)
        );
    }
    println!();

    // 5. Anomaly scan
    let alerts = board
        .scan_alerts(NaiveDate::from_ymd_opt(2024, 8, 25).unwrap())
        .await?;
    println!("🚨 Alerts ({}):", alerts.len());
    for alert in &alerts {
        println!("  [{:?}] {}", alert.severity, alert.message);
    }

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
