//! Headless shell: run one pipeline pass and print the summaries as JSON.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rusty_mandate::config::DashboardConfig;
use rusty_mandate::data::filter::FilterSelection;
use rusty_mandate::data::loader::{normalize_party, DatasetCache};
use rusty_mandate::data::model::Bucket;
use rusty_mandate::export;
use rusty_mandate::view::compute_view;

/// Summarise an election-results CSV for a filter selection.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    config: DashboardConfig,

    /// Keep only these regions (repeatable). Default: all.
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Keep only these winning-party buckets (repeatable, e.g. INC, "JD(S)").
    #[arg(long = "party")]
    parties: Vec<String>,

    #[arg(long, default_value_t = 0.0)]
    turnout_min: f64,

    #[arg(long, default_value_t = 100.0)]
    turnout_max: f64,

    /// Also write the filtered rows as CSV. Without a value the file is named
    /// `<dataset-name>_filtered_view.csv` in the current directory.
    #[arg(long)]
    export: Option<Option<PathBuf>>,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

fn selection(cli: &Cli, all: FilterSelection) -> FilterSelection {
    let mut sel = all;
    if !cli.regions.is_empty() {
        sel.regions = cli.regions.iter().cloned().collect();
    }
    if !cli.parties.is_empty() {
        sel.buckets = cli
            .parties
            .iter()
            .map(|p| normalize_party(p))
            .collect::<BTreeSet<Bucket>>();
    }
    sel.set_turnout_range(cli.turnout_min, cli.turnout_max);
    sel
}

fn run(cli: &Cli) -> Result<()> {
    let mut cache = DatasetCache::new();
    let dataset = cache
        .get_or_load(&cli.config.dataset)
        .with_context(|| format!("loading {}", cli.config.dataset.display()))?;

    let sel = selection(cli, FilterSelection::all(&dataset));
    let bundle = compute_view(&dataset, &sel, cli.config.close_threshold)?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&bundle.summaries)?
    } else {
        serde_json::to_string(&bundle.summaries)?
    };
    println!("{json}");

    if let Some(target) = &cli.export {
        let path = target
            .clone()
            .unwrap_or_else(|| PathBuf::from(export::export_file_name(&cli.config.dataset_name())));
        export::export_to_path(&bundle.filtered, &path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
