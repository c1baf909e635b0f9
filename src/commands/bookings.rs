use anyhow::Result;
use call_ledger::config;
use call_ledger::reader::LogReader;
use colored::Colorize;

/// Execute the bookings command
pub async fn execute() -> Result<()> {
    let cfg = config::load_config()?;
    let reader = LogReader::new(cfg.store.access());

    let bookings = reader.fetch_bookings().await;

    if bookings.is_empty() {
        println!("{}", "No confirmed bookings found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Confirmed bookings ({}):", bookings.len()).green().bold()
    );
    println!();
    for booking in &bookings {
        println!(
            "{}  {}  {}",
            booking.created_at.as_deref().unwrap_or("-"),
            booking.phone_number,
            booking.summary.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
