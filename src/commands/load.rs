use super::CommandResult;
use crate::database::ingestion::{IngestionSummary, Snapshot, SnapshotIngester};
use crate::database::{schema, ResultsDatabase};
use colored::*;
use std::path::Path;

/// Create the schema if needed and load a snapshot file.
pub async fn load(db: ResultsDatabase, snapshot_path: &Path, replace: bool) -> CommandResult<()> {
    println!(
        "🚀 Loading snapshot {}",
        snapshot_path.display().to_string().bright_cyan()
    );

    schema::create_schema(db.pool()).await?;
    let snapshot = Snapshot::from_path(snapshot_path)?;

    let summary = SnapshotIngester::new(db).ingest(&snapshot, replace).await?;
    print_summary(&summary);

    Ok(())
}

pub async fn verify(db: ResultsDatabase) -> CommandResult<()> {
    schema::verify_schema(db.pool()).await?;
    println!("✅ Schema OK: {}", schema::EXPECTED_TABLES.join(", ").bright_green());
    Ok(())
}

fn print_summary(summary: &IngestionSummary) {
    println!("\n{}", "📊 Load Summary".bright_cyan().bold());
    println!("{}", "=".repeat(40).bright_cyan());

    for (label, count) in [
        ("Mesas", summary.locations),
        ("Parties", summary.parties),
        ("Registration rows", summary.registrations),
        ("Vote rows", summary.votes),
    ] {
        println!("{}: {}", label.bright_white(), count.to_string().bright_yellow());
    }

    println!("{}", "-".repeat(40).bright_cyan());
    println!(
        "🎉 Loaded {} rows in {} ms",
        summary.total_rows().to_string().bright_green().bold(),
        summary.total_duration_ms.to_string().bright_green().bold()
    );
}
