use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rusty_mandate::data::loader::REQUIRED_COLUMNS;

/// Write a synthetic 224-seat results file shaped like the 2023 assembly.
#[derive(Parser)]
struct Cli {
    #[arg(long, default_value = "karnataka_assembly_2023.csv")]
    output: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (splitmix64).
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

const REGIONS: [&str; 6] = [
    "Bengaluru",
    "Central Karnataka",
    "Coastal Karnataka",
    "Hyderabad Karnataka",
    "Mumbai Karnataka",
    "Old Mysore",
];

/// (full party name, short label in the `Winner` column, seats won)
const OUTCOME: [(&str, &str, usize); 5] = [
    ("Indian National Congress", "INC", 135),
    ("Bharatiya Janata Party", "BJP", 66),
    ("Janata Dal (Secular)", "JD(S)", 19),
    ("Independent", "IND", 2),
    ("Sarvodaya Karnataka Paksha", "SKP", 2),
];

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut rng = SampleRng(cli.seed);

    let mut winners: Vec<(&str, &str)> = OUTCOME
        .iter()
        .flat_map(|&(party, label, n)| std::iter::repeat((party, label)).take(n))
        .collect();
    // Fisher-Yates so parties are spread over constituencies.
    for i in (1..winners.len()).rev() {
        let j = rng.below(i + 1);
        winners.swap(i, j);
    }

    let mut wtr = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    wtr.write_record(REQUIRED_COLUMNS)?;

    for (i, (party, label)) in winners.iter().enumerate() {
        let id = i + 1;
        let region = REGIONS[rng.below(REGIONS.len())];
        // Skewed toward small margins so close contests show up.
        let margin = (rng.next_f64().powi(2) * 60_000.0) as u64;
        let turnout = 55.0 + rng.next_f64() * 30.0;

        // A handful of unparseable cells, as found in scraped result sheets.
        let margin_cell = if id % 97 == 0 { "NA".to_string() } else { margin.to_string() };
        let turnout_cell = if id % 113 == 0 { String::new() } else { format!("{turnout:.2}") };

        wtr.write_record([
            id.to_string(),
            format!("Constituency {id:03}"),
            format!("Candidate {id:03}"),
            party.to_string(),
            label.to_string(),
            region.to_string(),
            margin_cell,
            turnout_cell,
            "1".to_string(),
        ])?;
    }
    wtr.flush()?;

    log::info!("Wrote {} constituencies to {}", winners.len(), cli.output.display());
    println!("Wrote {} constituencies to {}", winners.len(), cli.output.display());
    Ok(())
}
