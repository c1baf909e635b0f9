use anyhow::{Context, Result};
use call_ledger::config;
use call_ledger::models::CallRecord;
use call_ledger::writer::{LogWriter, SaveOutcome};
use colored::Colorize;
use std::path::Path;

/// Execute the save command
///
/// Reads one call record from a JSON file and drives it through the full
/// writer path (schema fallback and retries included). Used by ops to
/// re-drive a record that was dropped while the store was down.
pub async fn execute(file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let record: CallRecord = serde_json::from_str(&raw)
        .with_context(|| format!("invalid call record in {}", file.display()))?;

    let cfg = config::load_config()?;
    let writer = LogWriter::new(cfg.store.access());

    match writer.save(&record).await {
        SaveOutcome::Saved(_) => {
            println!(
                "{}",
                format!("✓ Saved call log for {}", record.phone_number).green()
            );
            Ok(())
        }
        SaveOutcome::Skipped(reason) => {
            println!("{}", format!("Skipped: {}", reason).yellow());
            println!("Set SUPABASE_URL and SUPABASE_KEY (or [store] in ledger.toml).");
            Ok(())
        }
        SaveOutcome::Failed(reason) => {
            anyhow::bail!("failed to save call log: {}", reason)
        }
    }
}
