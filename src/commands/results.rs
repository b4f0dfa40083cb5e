use super::CommandResult;
use crate::database::ResultsDatabase;
use crate::results::report::ResultsReport;
use crate::results::{ResultsEngine, ResultsQuery};
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    PrettyJson,
    Table,
}

/// Print the results report of a selection.
pub async fn results(
    db: ResultsDatabase,
    department: &str,
    municipality: &str,
    party: &str,
    format: OutputFormat,
) -> CommandResult<()> {
    let query = ResultsQuery::new(department, municipality, party)?;
    let report = ResultsEngine::new(db).compute(&query).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::PrettyJson => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }

    Ok(())
}

fn print_table(report: &ResultsReport) {
    println!(
        "{} {} / {} / {}",
        "📊".bright_cyan(),
        report.department.bright_cyan().bold(),
        report.municipality.bright_cyan(),
        report.party.bright_yellow()
    );
    println!(
        "{:<6} {:>12} {:>12} {:>12} {:>9} {:>9}",
        "", "padron", "validos", "recibidos", "part. %", "efic. %"
    );
    println!("{}", "-".repeat(65).bright_cyan());

    for (key, metrics) in report.results.entries() {
        println!(
            "{:<6} {:>12} {:>12} {:>12} {:>9.2} {:>9.2}",
            key,
            metrics.empadronados,
            metrics.votos_totales,
            metrics.votos_recibidos,
            metrics.participacion,
            metrics.eficiencia
        );
    }
}
