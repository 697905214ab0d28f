use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::model::{Bucket, ConstituencyResult};

/// Margins below this many votes count as a close contest.
pub const CLOSE_CONTEST_THRESHOLD: u64 = 2000;

// ---------------------------------------------------------------------------
// Seat counts and government formation
// ---------------------------------------------------------------------------

/// Rows per bucket, key-sorted. Buckets with no rows are absent.
pub fn bucket_counts(rows: &[ConstituencyResult]) -> BTreeMap<Bucket, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.winner_bucket).or_insert(0) += 1;
    }
    counts
}

/// Seats needed to govern alone.
pub fn majority_threshold(total_seats: usize) -> usize {
    total_seats / 2 + 1
}

/// Bucket with the most rows. Ties go to the bucket that sorts first.
pub fn governing_bucket(rows: &[ConstituencyResult]) -> Option<Bucket> {
    let mut best: Option<(Bucket, usize)> = None;
    for (bucket, count) in bucket_counts(rows) {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((bucket, count)),
        }
    }
    best.map(|(bucket, _)| bucket)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GovernmentStatus {
    Majority,
    #[serde(rename = "Hung Assembly")]
    HungAssembly,
}

impl fmt::Display for GovernmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GovernmentStatus::Majority => write!(f, "Majority"),
            GovernmentStatus::HungAssembly => write!(f, "Hung Assembly"),
        }
    }
}

/// Whether the governing bucket clears the majority mark. `None` for no rows.
pub fn government_status(rows: &[ConstituencyResult]) -> Option<GovernmentStatus> {
    let leader = governing_bucket(rows)?;
    let seats = bucket_counts(rows).get(&leader).copied().unwrap_or(0);
    if seats >= majority_threshold(rows.len()) {
        Some(GovernmentStatus::Majority)
    } else {
        Some(GovernmentStatus::HungAssembly)
    }
}

// ---------------------------------------------------------------------------
// Regional seat matrix
// ---------------------------------------------------------------------------

/// Region × bucket table of summed `seats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalMatrix {
    /// Column order: buckets present in the input, key-sorted.
    pub buckets: Vec<Bucket>,
    /// One entry per region, ascending.
    pub rows: Vec<RegionSeats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeats {
    pub region: String,
    /// Aligned with [`RegionalMatrix::buckets`].
    pub seats: Vec<u64>,
    #[serde(rename = "Total_Seats")]
    pub total_seats: u64,
}

impl RegionalMatrix {
    pub fn get(&self, region: &str, bucket: Bucket) -> Option<u64> {
        let col = self.buckets.iter().position(|b| *b == bucket)?;
        let row = self.rows.iter().find(|r| r.region == region)?;
        Some(row.seats[col])
    }
}

pub fn regional_seat_matrix(rows: &[ConstituencyResult]) -> RegionalMatrix {
    let mut sums: BTreeMap<&str, BTreeMap<Bucket, u64>> = BTreeMap::new();
    let mut present = BTreeSet::new();
    for row in rows {
        present.insert(row.winner_bucket);
        *sums
            .entry(row.region.as_str())
            .or_default()
            .entry(row.winner_bucket)
            .or_insert(0) += u64::from(row.seats);
    }

    let buckets: Vec<Bucket> = present.into_iter().collect();
    let table = sums
        .into_iter()
        .map(|(region, by_bucket)| {
            let seats: Vec<u64> = buckets
                .iter()
                .map(|b| by_bucket.get(b).copied().unwrap_or(0))
                .collect();
            RegionSeats {
                region: region.to_string(),
                total_seats: seats.iter().sum(),
                seats,
            }
        })
        .collect();

    RegionalMatrix {
        buckets,
        rows: table,
    }
}

// ---------------------------------------------------------------------------
// Statewide vs filtered seat share
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatShare {
    pub bucket: Bucket,
    pub statewide_seats: usize,
    pub filtered_seats: usize,
    pub statewide_pct: f64,
    pub filtered_pct: f64,
}

/// Percentage of `total`. Callers guarantee `total > 0`.
fn share(count: usize, total: usize) -> f64 {
    debug_assert!(total > 0, "share of an empty scope");
    count as f64 / total as f64 * 100.0
}

/// Seat counts and shares for both scopes, one entry per bucket in display order.
pub fn comparative_seat_share(
    full: &[ConstituencyResult],
    filtered: &[ConstituencyResult],
) -> Vec<SeatShare> {
    let state_counts = bucket_counts(full);
    let filtered_counts = bucket_counts(filtered);
    Bucket::DISPLAY_ORDER
        .into_iter()
        .map(|bucket| {
            let statewide_seats = state_counts.get(&bucket).copied().unwrap_or(0);
            let filtered_seats = filtered_counts.get(&bucket).copied().unwrap_or(0);
            SeatShare {
                bucket,
                statewide_seats,
                filtered_seats,
                statewide_pct: share(statewide_seats, full.len()),
                filtered_pct: share(filtered_seats, filtered.len()),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Close contests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingSafeSplit {
    pub threshold: u64,
    pub swing_count: usize,
    pub safe_count: usize,
    #[serde(skip)]
    pub swing: Vec<ConstituencyResult>,
    #[serde(skip)]
    pub safe: Vec<ConstituencyResult>,
}

/// Split rows into close (`margin < threshold`) and safe seats.
pub fn swing_vs_safe(rows: &[ConstituencyResult], threshold: u64) -> SwingSafeSplit {
    let (swing, safe): (Vec<_>, Vec<_>) = rows
        .iter()
        .cloned()
        .partition(|r| r.margin < threshold);
    SwingSafeSplit {
        threshold,
        swing_count: swing.len(),
        safe_count: safe.len(),
        swing,
        safe,
    }
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

/// Linear-interpolated quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_turnouts(rows: &[ConstituencyResult]) -> Vec<f64> {
    let mut values: Vec<f64> = rows.iter().map(|r| r.turnout_percentage).collect();
    values.sort_by(f64::total_cmp);
    values
}

pub fn median_turnout(rows: &[ConstituencyResult]) -> Option<f64> {
    quantile(&sorted_turnouts(rows), 0.5)
}

pub fn mean_turnout(rows: &[ConstituencyResult]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    Some(rows.iter().map(|r| r.turnout_percentage).sum::<f64>() / rows.len() as f64)
}

/// Five-number summary of winning margins within one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginSpread {
    pub bucket: Bucket,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Margin spread per bucket present in `rows`, key-sorted.
pub fn margin_distribution(rows: &[ConstituencyResult]) -> Vec<MarginSpread> {
    let mut by_bucket: BTreeMap<Bucket, Vec<f64>> = BTreeMap::new();
    for row in rows {
        by_bucket
            .entry(row.winner_bucket)
            .or_default()
            .push(row.margin as f64);
    }
    by_bucket
        .into_iter()
        .filter_map(|(bucket, mut margins)| {
            margins.sort_by(f64::total_cmp);
            Some(MarginSpread {
                bucket,
                count: margins.len(),
                min: *margins.first()?,
                q1: quantile(&margins, 0.25)?,
                median: quantile(&margins, 0.5)?,
                q3: quantile(&margins, 0.75)?,
                max: *margins.last()?,
            })
        })
        .collect()
}

/// Distinct regions in `rows`, ascending.
pub fn regions(rows: &[ConstituencyResult]) -> Vec<String> {
    rows.iter()
        .map(|r| r.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
