//! Pipeline entry point and display shaping.
//!
//! [`compute_view`] is the only path from a dataset and a selection to
//! something a shell can draw. The helpers below only reshape what the
//! aggregator produced; they do not compute anything new.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::color::bucket_hex;
use crate::data::aggregate::{
    self, GovernmentStatus, MarginSpread, RegionalMatrix, SeatShare, SwingSafeSplit,
};
use crate::data::filter::{self, EmptyResultError, FilterSelection};
use crate::data::model::{Bucket, ConstituencyResult, Dataset};

// ---------------------------------------------------------------------------
// ViewBundle
// ---------------------------------------------------------------------------

/// Every named aggregate a shell may show for one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summaries {
    pub bucket_counts_state: BTreeMap<Bucket, usize>,
    pub bucket_counts_filtered: BTreeMap<Bucket, usize>,
    pub total_seats_state: usize,
    pub total_seats_filtered: usize,
    pub majority_threshold: usize,
    /// Statewide leader and whether it governs alone.
    pub governing_bucket: Option<Bucket>,
    pub government_status: Option<GovernmentStatus>,
    pub regional_matrix: RegionalMatrix,
    pub comparative_seat_share: Vec<SeatShare>,
    pub swing_vs_safe: SwingSafeSplit,
    pub median_turnout: Option<f64>,
    pub mean_turnout: Option<f64>,
    pub margin_distribution: Vec<MarginSpread>,
}

/// Output of one pipeline pass: full dataset, filtered rows, summaries.
#[derive(Debug, Clone)]
pub struct ViewBundle {
    pub dataset: Arc<Dataset>,
    pub filtered: Vec<ConstituencyResult>,
    pub summaries: Summaries,
}

/// Filter, then aggregate. Stops before any aggregation when the selection
/// matches nothing.
pub fn compute_view(
    dataset: &Arc<Dataset>,
    selection: &FilterSelection,
    close_threshold: u64,
) -> Result<ViewBundle, EmptyResultError> {
    let full = dataset.rows();
    let filtered = filter::apply(full, selection)?;
    log::debug!(
        "Recomputing view: {} of {} rows selected",
        filtered.len(),
        full.len()
    );

    let summaries = Summaries {
        bucket_counts_state: aggregate::bucket_counts(full),
        bucket_counts_filtered: aggregate::bucket_counts(&filtered),
        total_seats_state: full.len(),
        total_seats_filtered: filtered.len(),
        majority_threshold: aggregate::majority_threshold(full.len()),
        governing_bucket: aggregate::governing_bucket(full),
        government_status: aggregate::government_status(full),
        regional_matrix: aggregate::regional_seat_matrix(&filtered),
        comparative_seat_share: aggregate::comparative_seat_share(full, &filtered),
        swing_vs_safe: aggregate::swing_vs_safe(&filtered, close_threshold),
        median_turnout: aggregate::median_turnout(&filtered),
        mean_turnout: aggregate::mean_turnout(&filtered),
        margin_distribution: aggregate::margin_distribution(&filtered),
    };

    Ok(ViewBundle {
        dataset: Arc::clone(dataset),
        filtered,
        summaries,
    })
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// A plain text table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn seat_matrix_table(matrix: &RegionalMatrix) -> Table {
    let mut headers = vec!["Region".to_string()];
    headers.extend(matrix.buckets.iter().map(|b| b.label().to_string()));
    headers.push("Total_Seats".to_string());

    let rows = matrix
        .rows
        .iter()
        .map(|r| {
            let mut cells = vec![r.region.clone()];
            cells.extend(r.seats.iter().map(u64::to_string));
            cells.push(r.total_seats.to_string());
            cells
        })
        .collect();

    Table { headers, rows }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginOrder {
    Ascending,
    Descending,
}

/// Constituency listing sorted by margin. Ties keep source order.
pub fn constituency_table<'a>(
    rows: impl IntoIterator<Item = &'a ConstituencyResult>,
    order: MarginOrder,
) -> Table {
    let mut sorted: Vec<&ConstituencyResult> = rows.into_iter().collect();
    match order {
        MarginOrder::Ascending => sorted.sort_by_key(|r| r.margin),
        MarginOrder::Descending => sorted.sort_by(|a, b| b.margin.cmp(&a.margin)),
    }

    let headers = [
        "Constituency_ID",
        "Constituency_Name",
        "Winner_Name",
        "Winner_Party",
        "Winner",
        "Region",
        "Margin",
        "Turnout_Percentage",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    let rows = sorted
        .into_iter()
        .map(|r| {
            vec![
                r.constituency_id.clone(),
                r.constituency_name.clone(),
                r.winner_name.clone(),
                r.winner_party.clone(),
                r.winner_bucket.to_string(),
                r.region.clone(),
                r.margin.to_string(),
                format!("{:.2}", r.turnout_percentage),
            ]
        })
        .collect();

    Table { headers, rows }
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// One grouped-bar series of the statewide/filtered comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSeries {
    pub scope: &'static str,
    /// `(bucket, seat share %)` in display order.
    pub points: Vec<(Bucket, f64)>,
}

pub fn seat_share_series(shares: &[SeatShare]) -> [ShareSeries; 2] {
    [
        ShareSeries {
            scope: "Statewide",
            points: shares.iter().map(|s| (s.bucket, s.statewide_pct)).collect(),
        },
        ShareSeries {
            scope: "Filtered View",
            points: shares.iter().map(|s| (s.bucket, s.filtered_pct)).collect(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub bucket: Bucket,
    pub seats: usize,
    pub share_pct: f64,
    pub color: &'static str,
}

/// Donut slices for the filtered scope; buckets without seats are dropped.
pub fn donut_slices(shares: &[SeatShare]) -> Vec<Slice> {
    shares
        .iter()
        .filter(|s| s.filtered_seats > 0)
        .map(|s| Slice {
            bucket: s.bucket,
            seats: s.filtered_seats,
            share_pct: s.filtered_pct,
            color: bucket_hex(s.bucket),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub constituency_name: String,
    pub winner_name: String,
    pub winner_party: String,
    pub bucket: Bucket,
    pub turnout: f64,
    pub margin: u64,
    pub color: &'static str,
}

/// Margin vs turnout points, one per row.
pub fn scatter_points(rows: &[ConstituencyResult]) -> Vec<ScatterPoint> {
    rows.iter()
        .map(|r| ScatterPoint {
            constituency_name: r.constituency_name.clone(),
            winner_name: r.winner_name.clone(),
            winner_party: r.winner_party.clone(),
            bucket: r.winner_bucket,
            turnout: r.turnout_percentage,
            margin: r.margin,
            color: bucket_hex(r.winner_bucket),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::CLOSE_CONTEST_THRESHOLD;

    fn row(id: u32, region: &str, bucket: Bucket, margin: u64) -> ConstituencyResult {
        ConstituencyResult {
            constituency_id: id.to_string(),
            constituency_name: format!("Seat {id}"),
            winner_name: format!("Winner {id}"),
            winner_party: bucket.label().to_string(),
            winner_bucket: bucket,
            region: region.to_string(),
            margin,
            turnout_percentage: 60.0 + id as f64,
            seats: 1,
        }
    }

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_rows(
            "karnataka_2023",
            vec![
                row(1, "Coastal", Bucket::Inc, 500),
                row(2, "Coastal", Bucket::Bjp, 2500),
                row(3, "Central", Bucket::Inc, 4000),
                row(4, "Central", Bucket::Jds, 1200),
                row(5, "Kalyana", Bucket::Inc, 9000),
            ],
        ))
    }

    #[test]
    fn bundle_carries_both_scopes() {
        let ds = dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle_region("Kalyana");
        let bundle = compute_view(&ds, &sel, CLOSE_CONTEST_THRESHOLD).unwrap();

        assert!(Arc::ptr_eq(&bundle.dataset, &ds));
        assert_eq!(bundle.filtered.len(), 4);
        let s = &bundle.summaries;
        assert_eq!(s.total_seats_state, 5);
        assert_eq!(s.total_seats_filtered, 4);
        assert_eq!(s.majority_threshold, 3);
        assert_eq!(s.governing_bucket, Some(Bucket::Inc));
        assert_eq!(s.government_status, Some(GovernmentStatus::Majority));
        assert_eq!(s.bucket_counts_filtered[&Bucket::Inc], 2);
        assert_eq!((s.swing_vs_safe.swing_count, s.swing_vs_safe.safe_count), (2, 2));
        assert_eq!(s.median_turnout, Some(62.5));
        assert_eq!(s.regional_matrix.rows.len(), 2);
    }

    #[test]
    fn empty_selection_halts_before_aggregation() {
        let ds = dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.buckets.clear();
        assert_eq!(
            compute_view(&ds, &sel, CLOSE_CONTEST_THRESHOLD).unwrap_err(),
            EmptyResultError
        );
    }

    #[test]
    fn seat_matrix_table_layout() {
        let ds = dataset();
        let bundle = compute_view(&ds, &FilterSelection::all(&ds), CLOSE_CONTEST_THRESHOLD).unwrap();
        let table = seat_matrix_table(&bundle.summaries.regional_matrix);
        assert_eq!(table.headers, vec!["Region", "BJP", "INC", "JDS", "Total_Seats"]);
        assert_eq!(table.rows[0], vec!["Central", "0", "1", "1", "2"]);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn constituency_table_sorts_by_margin() {
        let ds = dataset();
        let desc = constituency_table(ds.rows(), MarginOrder::Descending);
        let margins: Vec<&str> = desc.rows.iter().map(|r| r[6].as_str()).collect();
        assert_eq!(margins, vec!["9000", "4000", "2500", "1200", "500"]);

        let asc = constituency_table(ds.rows(), MarginOrder::Ascending);
        assert_eq!(asc.rows[0][0], "1");
        assert_eq!(asc.rows[0][4], "INC");
    }

    #[test]
    fn share_series_and_slices() {
        let ds = dataset();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle_region("Central");
        let bundle = compute_view(&ds, &sel, CLOSE_CONTEST_THRESHOLD).unwrap();

        let [state, filtered] = seat_share_series(&bundle.summaries.comparative_seat_share);
        assert_eq!(state.scope, "Statewide");
        assert_eq!(filtered.points[0], (Bucket::Inc, 2.0 / 3.0 * 100.0));
        assert_eq!(state.points.len(), 4);

        let slices = donut_slices(&bundle.summaries.comparative_seat_share);
        let buckets: Vec<Bucket> = slices.iter().map(|s| s.bucket).collect();
        assert_eq!(buckets, vec![Bucket::Inc, Bucket::Bjp]);
        assert_eq!(slices[1].color, "#FF7F0E");
    }

    #[test]
    fn scatter_points_follow_rows() {
        let ds = dataset();
        let points = scatter_points(ds.rows());
        assert_eq!(points.len(), 5);
        assert_eq!(points[3].bucket, Bucket::Jds);
        assert_eq!(points[3].color, "#2CA02C");
        assert_eq!(points[3].margin, 1200);
    }

    #[test]
    fn summaries_serialize_with_labels() {
        let ds = dataset();
        let bundle = compute_view(&ds, &FilterSelection::all(&ds), CLOSE_CONTEST_THRESHOLD).unwrap();
        let json = serde_json::to_value(&bundle.summaries).unwrap();
        assert_eq!(json["governing_bucket"], "INC");
        assert_eq!(json["government_status"], "Majority");
        assert_eq!(json["bucket_counts_state"]["INC"], 3);
        assert_eq!(json["swing_vs_safe"]["swing_count"], 2);
        assert!(json["swing_vs_safe"].get("swing").is_none());
    }
}
