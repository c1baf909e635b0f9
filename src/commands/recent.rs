use anyhow::Result;
use call_ledger::config;
use call_ledger::models::CallLogRow;
use call_ledger::reader::LogReader;
use colored::Colorize;

/// Execute the recent command
pub async fn execute(limit: usize, format: &str) -> Result<()> {
    let cfg = config::load_config()?;
    let reader = LogReader::new(cfg.store.access());

    let rows = reader.fetch_recent(limit).await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No call logs found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Recent call logs ({}):", rows.len()).bold());
    println!();
    for row in &rows {
        print_row(row);
    }

    Ok(())
}

fn print_row(row: &CallLogRow) {
    let when = row.created_at.as_deref().unwrap_or("-");
    let summary = row.summary.as_deref().unwrap_or("");
    let booked = summary.contains("Confirmed");

    let line = format!(
        "{}  {}  {:>5}s  {}",
        when,
        row.phone_number,
        row.duration_seconds,
        summary
    );
    if booked {
        println!("{}", line.green());
    } else {
        println!("{}", line);
    }
}
