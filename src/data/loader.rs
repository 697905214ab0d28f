use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use thiserror::Error;

use super::model::{Bucket, CoercionCounts, ConstituencyResult, Dataset};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Columns every input file must carry. Names are matched exactly; order is free.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Constituency_ID",
    "Constituency_Name",
    "Winner_Name",
    "Winner_Party",
    "Winner",
    "Region",
    "Margin",
    "Turnout_Percentage",
    "Seats",
];

pub const DEFAULT_MARGIN: u64 = 0;
pub const DEFAULT_TURNOUT: f64 = 72.0;
pub const DEFAULT_SEATS: u32 = 1;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("duplicate Constituency_ID '{id}' on data row {row}")]
    DuplicateId { id: String, row: usize },

    #[error("reading {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV at data row {row}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Party normalization
// ---------------------------------------------------------------------------

/// Classify a raw winner label into its [`Bucket`]. Checks run in a fixed
/// order and the first match wins.
pub fn normalize_party(raw: &str) -> Bucket {
    let p = raw.trim().to_uppercase();
    if p == "INC" || p.contains("CONGRESS") {
        Bucket::Inc
    } else if p == "BJP" || p.contains("BHARATIYA JANATA") {
        Bucket::Bjp
    } else if p.starts_with("JD") || p.contains("JANATA DAL") {
        Bucket::Jds
    } else {
        Bucket::Others
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Non-negative whole number; finite floats are truncated toward zero.
fn coerce_count(raw: &str) -> Option<u64> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u64),
        _ => None,
    }
}

fn coerce_turnout(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a results CSV from disk. The dataset is named after the file stem.
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_reader(name, file)?;
    log::info!(
        "Loaded {} constituencies across {} regions from {}",
        dataset.len(),
        dataset.regions().len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse, validate, coerce and normalize CSV content from any reader.
pub fn load_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv { row: 0, source })?
        .clone();

    let position: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !position.contains_key(*c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        log::error!("Schema check failed, missing {missing:?}");
        return Err(LoadError::Schema { missing });
    }
    let col = |name: &str| position[name];
    let (id_idx, name_idx, winner_name_idx, party_idx, winner_idx) = (
        col("Constituency_ID"),
        col("Constituency_Name"),
        col("Winner_Name"),
        col("Winner_Party"),
        col("Winner"),
    );
    let (region_idx, margin_idx, turnout_idx, seats_idx) = (
        col("Region"),
        col("Margin"),
        col("Turnout_Percentage"),
        col("Seats"),
    );

    let mut rows = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut coercions = CoercionCounts::default();

    for (idx, result) in reader.records().enumerate() {
        let row_no = idx + 1;
        let record = result.map_err(|source| LoadError::Csv { row: row_no, source })?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        let constituency_id = cell(id_idx).trim().to_string();
        if !seen_ids.insert(constituency_id.clone()) {
            return Err(LoadError::DuplicateId {
                id: constituency_id,
                row: row_no,
            });
        }

        let margin = coerce_count(cell(margin_idx)).unwrap_or_else(|| {
            coercions.margin += 1;
            DEFAULT_MARGIN
        });
        let turnout_percentage = coerce_turnout(cell(turnout_idx)).unwrap_or_else(|| {
            coercions.turnout += 1;
            DEFAULT_TURNOUT
        });
        let seats = coerce_count(cell(seats_idx))
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_else(|| {
                coercions.seats += 1;
                DEFAULT_SEATS
            });

        rows.push(ConstituencyResult {
            constituency_id,
            constituency_name: cell(name_idx).to_string(),
            winner_name: cell(winner_name_idx).to_string(),
            winner_party: cell(party_idx).to_string(),
            winner_bucket: normalize_party(cell(winner_idx)),
            region: cell(region_idx).to_string(),
            margin,
            turnout_percentage,
            seats,
        });
    }

    if coercions.total() > 0 {
        log::warn!(
            "Coerced non-numeric cells to defaults: margin={}, turnout={}, seats={}",
            coercions.margin,
            coercions.turnout,
            coercions.seats
        );
    }

    Ok(Dataset::with_coercions(name, rows, coercions))
}

// ---------------------------------------------------------------------------
// DatasetCache – load once, reuse until the source changes
// ---------------------------------------------------------------------------

/// Identity of a source file at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceStamp {
    fn of(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(SourceStamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Cache of loaded datasets keyed by canonical path.
///
/// An entry is reused while the file's modification time and length are
/// unchanged. Each instance is independent.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, (SourceStamp, Arc<Dataset>)>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, reading the file only when it is
    /// new to the cache or has changed since the last read.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let key = std::fs::canonicalize(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stamp = SourceStamp::of(&key)?;

        if let Some((cached, dataset)) = self.entries.get(&key) {
            if *cached == stamp {
                log::debug!("Cache hit for {}", key.display());
                return Ok(Arc::clone(dataset));
            }
            log::info!("{} changed on disk, reloading", key.display());
        }

        let dataset = Arc::new(load_csv(&key)?);
        self.loads += 1;
        self.entries.insert(key, (stamp, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Drop the entry for one path. Returns whether anything was cached.
    pub fn invalidate_path(&mut self, path: &Path) -> bool {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    /// Drop every entry.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// How many times a file was actually read.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}
