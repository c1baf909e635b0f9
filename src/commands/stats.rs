use anyhow::Result;
use call_ledger::config;
use call_ledger::reader::LogReader;
use colored::Colorize;

/// Execute the stats command
pub async fn execute() -> Result<()> {
    let cfg = config::load_config()?;
    let reader = LogReader::new(cfg.store.access());

    let stats = reader.fetch_stats().await;

    println!("{}", "Call statistics:".bold());
    println!();
    println!("  Total calls:     {}", stats.total_calls);
    println!("  Total bookings:  {}", stats.total_bookings);
    println!("  Avg duration:    {}s", stats.avg_duration_seconds);
    println!(
        "  Booking rate:    {}",
        format!("{}%", stats.booking_rate_percent).green()
    );

    Ok(())
}
