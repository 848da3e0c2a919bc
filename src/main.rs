mod cli;

use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use compound::config::Config;
use compound::engine;
use compound::loader::{self, LoadReport};
use compound::tables::store::MarketData;
use compound::tables::TimeTable;

use cli::{parse_date_arg, Cli, Commands, Kind};

fn main() -> Result<()> {
    // Logs go to stderr so that --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Performance {
            kind,
            from,
            to,
            lookback_days,
            config,
        } => {
            let start = parse_date_arg(&from)?;
            let end = parse_date_arg(&to)?;
            let lookback = resolve_lookback(lookback_days, config.as_deref())?;
            handle_performance(&cli.data_dir, kind, lookback, start, end, cli.json)
        }
        Commands::Inspect => handle_inspect(&cli.data_dir, cli.json),
    }
}

/// The lookback window has no default: a flag wins over the config file,
/// and having neither is an error.
fn resolve_lookback(flag: Option<u32>, config: Option<&Path>) -> Result<u32> {
    match (flag, config) {
        (Some(days), _) => Ok(days),
        (None, Some(path)) => Ok(Config::from_file(path)?.lookback_days),
        (None, None) => Err(anyhow!(
            "No lookback window configured. Pass --lookback-days or --config."
        )),
    }
}

fn handle_performance(
    data_dir: &Path,
    kind: Kind,
    lookback_days: u32,
    start: NaiveDate,
    end: NaiveDate,
    json: bool,
) -> Result<()> {
    let (data, report) = loader::load_dir(data_dir)?;
    info!(
        kind = kind.as_str(),
        %start,
        %end,
        lookback_days,
        "Computing performance"
    );

    let series = match kind {
        Kind::Asset => engine::asset_performance(&data, lookback_days, start, end)?,
        Kind::Currency => engine::currency_performance(&data, lookback_days, start, end)?,
        Kind::Total => engine::total_performance(&data, lookback_days, start, end)?,
    };
    let dates = series_dates(&data, kind, start, end);

    if json {
        let points: Vec<_> = dates
            .iter()
            .zip(&series)
            .map(|(date, value)| {
                serde_json::json!({ "date": date.to_string(), "index": value })
            })
            .collect();
        let payload = serde_json::json!({
            "kind": kind.as_str(),
            "from": start.to_string(),
            "to": end.to_string(),
            "lookback_days": lookback_days,
            "series": points,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if series.is_empty() {
        println!(
            "\n{} No {} dates between {} and {}",
            "ℹ".blue().bold(),
            kind.as_str(),
            start,
            end
        );
        return Ok(());
    }

    #[derive(Tabled)]
    struct IndexRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Index")]
        index: String,
    }

    let rows: Vec<IndexRow> = dates
        .iter()
        .zip(&series)
        .map(|(date, value)| IndexRow {
            date: date.to_string(),
            index: format!("{:.6}", value),
        })
        .collect();

    println!(
        "\n{} {} performance, {} → {} ({}-day lookback)\n",
        "✓".green().bold(),
        kind.as_str(),
        start,
        end,
        lookback_days
    );
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    let last = series[series.len() - 1];
    if !last.is_finite() {
        println!(
            "\n{} Non-finite index values: a zero comparison value or an unfilled weight poisoned the series",
            "⚠".yellow().bold()
        );
    } else if last >= 1.0 {
        println!("\n  Final index: {}", format!("{:.6}", last).green());
    } else {
        println!("\n  Final index: {}", format!("{:.6}", last).red());
    }

    let imputed = report.prices_imputed + report.exchanges_imputed + report.weights_imputed;
    if imputed > 0 {
        println!(
            "  {} {} missing cells imputed at load time",
            "ℹ".blue().bold(),
            imputed
        );
    }

    Ok(())
}

/// Dates the emitted series is indexed by: the source table's rows in range.
fn series_dates(data: &MarketData, kind: Kind, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let table = match kind {
        Kind::Currency => data.exchanges(),
        Kind::Asset | Kind::Total => data.prices(),
    };
    table.dates()[table.slice_range(start, end)].to_vec()
}

fn handle_inspect(data_dir: &Path, json: bool) -> Result<()> {
    let (data, report) = loader::load_dir(data_dir)?;

    if json {
        let payload = serde_json::json!({
            "tables": [
                summary_json("prices", data.prices(), report.prices_imputed),
                summary_json("exchanges", data.exchanges(), report.exchanges_imputed),
                summary_json("weights", data.weights(), report.weights_imputed),
            ],
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct TableSummary {
        #[tabled(rename = "Table")]
        name: &'static str,
        #[tabled(rename = "Rows")]
        rows: usize,
        #[tabled(rename = "Columns")]
        columns: usize,
        #[tabled(rename = "From")]
        from: String,
        #[tabled(rename = "To")]
        to: String,
        #[tabled(rename = "Imputed")]
        imputed: usize,
    }

    fn summarize(name: &'static str, table: &TimeTable, imputed: usize) -> TableSummary {
        TableSummary {
            name,
            rows: table.n_rows(),
            columns: table.n_cols(),
            from: table.dates().first().map_or("-".to_string(), |d| d.to_string()),
            to: table.dates().last().map_or("-".to_string(), |d| d.to_string()),
            imputed,
        }
    }

    let summaries = vec![
        summarize("prices", data.prices(), report.prices_imputed),
        summarize("exchanges", data.exchanges(), report.exchanges_imputed),
        summarize("weights", data.weights(), report.weights_imputed),
    ];

    println!(
        "\n{} Market data, {} asset columns\n",
        "✓".green().bold(),
        data.mapping().len()
    );
    let table = Table::new(summaries).with(Style::rounded()).to_string();
    println!("{}", table);

    report_note(&report);
    Ok(())
}

fn report_note(report: &LoadReport) {
    let imputed = report.prices_imputed + report.exchanges_imputed + report.weights_imputed;
    if imputed > 0 {
        println!(
            "\n{} {} missing cells imputed at load time",
            "ℹ".blue().bold(),
            imputed
        );
    }
}

fn summary_json(name: &str, table: &TimeTable, imputed: usize) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "rows": table.n_rows(),
        "columns": table.n_cols(),
        "from": table.dates().first().map(|d| d.to_string()),
        "to": table.dates().last().map(|d| d.to_string()),
        "imputed": imputed,
    })
}
