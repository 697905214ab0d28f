use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Bucket – canonical winning-party grouping
// ---------------------------------------------------------------------------

/// One of the four party groupings a constituency winner is classified into.
///
/// Variants are declared in label order (`BJP < INC < JDS < Others`), so the
/// derived `Ord` is the key order used by sorted maps and tie-breaks. Use
/// [`Bucket::DISPLAY_ORDER`] when presenting the buckets side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Bucket {
    #[serde(rename = "BJP")]
    Bjp,
    #[serde(rename = "INC")]
    Inc,
    #[serde(rename = "JDS")]
    Jds,
    Others,
}

impl Bucket {
    /// Fixed presentation order used by the seat-share comparison and the filter widgets.
    pub const DISPLAY_ORDER: [Bucket; 4] = [Bucket::Inc, Bucket::Bjp, Bucket::Jds, Bucket::Others];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Bjp => "BJP",
            Bucket::Inc => "INC",
            Bucket::Jds => "JDS",
            Bucket::Others => "Others",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ConstituencyResult – one row of the results table
// ---------------------------------------------------------------------------

/// A single seat's result, already coerced and normalized.
///
/// Field order and serde names match the CSV header, so serializing a row
/// produces the canonical export layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstituencyResult {
    #[serde(rename = "Constituency_ID")]
    pub constituency_id: String,
    #[serde(rename = "Constituency_Name")]
    pub constituency_name: String,
    #[serde(rename = "Winner_Name")]
    pub winner_name: String,
    /// Party label exactly as supplied by the source.
    #[serde(rename = "Winner_Party")]
    pub winner_party: String,
    #[serde(rename = "Winner")]
    pub winner_bucket: Bucket,
    #[serde(rename = "Region")]
    pub region: String,
    /// Votes by which the winner beat the runner-up.
    #[serde(rename = "Margin")]
    pub margin: u64,
    #[serde(rename = "Turnout_Percentage")]
    pub turnout_percentage: f64,
    #[serde(rename = "Seats")]
    pub seats: u32,
}

// ---------------------------------------------------------------------------
// CoercionCounts – how many cells fell back to a default
// ---------------------------------------------------------------------------

/// Number of cells per numeric column that were replaced by their default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoercionCounts {
    pub margin: usize,
    pub turnout: usize,
    pub seats: usize,
}

impl CoercionCounts {
    pub fn total(&self) -> usize {
        self.margin + self.turnout + self.seats
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The canonical, immutable dataset. Shared as `Arc<Dataset>` after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Short name of the source, used to name exports.
    pub name: String,
    rows: Vec<ConstituencyResult>,
    /// Sorted set of distinct regions.
    regions: BTreeSet<String>,
    coercions: CoercionCounts,
}

impl Dataset {
    /// Build the region index from the loaded rows.
    pub fn from_rows(name: impl Into<String>, rows: Vec<ConstituencyResult>) -> Self {
        Self::with_coercions(name, rows, CoercionCounts::default())
    }

    pub fn with_coercions(
        name: impl Into<String>,
        rows: Vec<ConstituencyResult>,
        coercions: CoercionCounts,
    ) -> Self {
        let regions = rows.iter().map(|r| r.region.clone()).collect();
        Dataset {
            name: name.into(),
            rows,
            regions,
            coercions,
        }
    }

    pub fn rows(&self) -> &[ConstituencyResult] {
        &self.rows
    }

    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    pub fn coercions(&self) -> CoercionCounts {
        self.coercions
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
