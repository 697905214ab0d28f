//! Command-line and environment configuration shared by the binaries.

use std::path::PathBuf;

use clap::Args;

use crate::data::aggregate::CLOSE_CONTEST_THRESHOLD;

pub const DEFAULT_DATASET: &str = "karnataka_assembly_2023.csv";

#[derive(Debug, Clone, Args)]
pub struct DashboardConfig {
    /// Results CSV, one row per constituency.
    #[arg(env = "MANDATE_DATASET", default_value = DEFAULT_DATASET)]
    pub dataset: PathBuf,

    /// Margins below this many votes count as close contests.
    #[arg(long, env = "MANDATE_CLOSE_THRESHOLD", default_value_t = CLOSE_CONTEST_THRESHOLD)]
    pub close_threshold: u64,

    /// Prefix for exported files. Defaults to the dataset's file stem.
    #[arg(long)]
    pub dataset_name: Option<String>,
}

impl DashboardConfig {
    /// Export prefix: explicit name, else the file stem, else "dataset".
    pub fn dataset_name(&self) -> String {
        self.dataset_name.clone().unwrap_or_else(|| {
            self.dataset
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("dataset")
                .to_string()
        })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            close_threshold: CLOSE_CONTEST_THRESHOLD,
            dataset_name: None,
        }
    }
}
