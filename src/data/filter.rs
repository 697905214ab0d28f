use std::collections::BTreeSet;

use thiserror::Error;

use super::model::{Bucket, ConstituencyResult, Dataset};

pub const TURNOUT_FLOOR: f64 = 0.0;
pub const TURNOUT_CEILING: f64 = 100.0;

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// The user's current predicates. A row passes when its region and bucket are
/// selected and its turnout lies inside the inclusive range. An empty region or
/// bucket set matches nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub regions: BTreeSet<String>,
    pub buckets: BTreeSet<Bucket>,
    pub turnout_min: f64,
    pub turnout_max: f64,
}

/// Raised when a selection leaves no rows; nothing downstream may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No data matches the current filters. Relax the filters to continue.")]
pub struct EmptyResultError;

impl FilterSelection {
    /// Everything selected: all regions, all buckets, full turnout range.
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            regions: dataset.regions().clone(),
            buckets: Bucket::DISPLAY_ORDER.into_iter().collect(),
            turnout_min: TURNOUT_FLOOR,
            turnout_max: TURNOUT_CEILING,
        }
    }

    pub fn matches(&self, row: &ConstituencyResult) -> bool {
        self.regions.contains(&row.region)
            && self.buckets.contains(&row.winner_bucket)
            && self.turnout_min <= row.turnout_percentage
            && row.turnout_percentage <= self.turnout_max
    }

    pub fn toggle_region(&mut self, region: &str) {
        if !self.regions.remove(region) {
            self.regions.insert(region.to_string());
        }
    }

    pub fn toggle_bucket(&mut self, bucket: Bucket) {
        if !self.buckets.remove(&bucket) {
            self.buckets.insert(bucket);
        }
    }

    /// Set the inclusive turnout range; inverted bounds are swapped.
    pub fn set_turnout_range(&mut self, a: f64, b: f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.turnout_min = lo;
        self.turnout_max = hi;
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows satisfying every predicate in `selection`, in source order.
pub fn apply(
    rows: &[ConstituencyResult],
    selection: &FilterSelection,
) -> Result<Vec<ConstituencyResult>, EmptyResultError> {
    let filtered: Vec<ConstituencyResult> = rows
        .iter()
        .filter(|row| selection.matches(row))
        .cloned()
        .collect();
    if filtered.is_empty() {
        log::debug!("Selection {selection:?} matched no rows");
        return Err(EmptyResultError);
    }
    Ok(filtered)
}

/// Rows belonging to a single region (regional deep-dive).
pub fn rows_in_region<'a>(
    rows: &'a [ConstituencyResult],
    region: &str,
) -> Vec<&'a ConstituencyResult> {
    rows.iter().filter(|r| r.region == region).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u32, region: &str, bucket: Bucket, turnout: f64) -> ConstituencyResult {
        ConstituencyResult {
            constituency_id: id.to_string(),
            constituency_name: format!("Seat {id}"),
            winner_name: format!("Winner {id}"),
            winner_party: bucket.label().to_string(),
            winner_bucket: bucket,
            region: region.to_string(),
            margin: 1000 * id as u64,
            turnout_percentage: turnout,
            seats: 1,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_rows(
            "sample",
            vec![
                row(1, "Coastal", Bucket::Inc, 65.0),
                row(2, "Coastal", Bucket::Bjp, 80.0),
                row(3, "Central", Bucket::Jds, 72.0),
                row(4, "Central", Bucket::Others, 90.5),
                row(5, "Kalyana", Bucket::Inc, 55.0),
            ],
        )
    }

    #[test]
    fn default_selection_keeps_everything() {
        let ds = sample();
        let sel = FilterSelection::all(&ds);
        assert_eq!(apply(ds.rows(), &sel).unwrap(), ds.rows().to_vec());
    }

    #[test]
    fn sound_and_complete_over_selection_grid() {
        let ds = sample();
        let region_sets: Vec<Vec<&str>> = vec![
            vec!["Coastal"],
            vec!["Central", "Kalyana"],
            vec!["Coastal", "Central", "Kalyana"],
        ];
        let bucket_sets: Vec<Vec<Bucket>> = vec![
            vec![Bucket::Inc],
            vec![Bucket::Bjp, Bucket::Jds, Bucket::Others],
            Bucket::DISPLAY_ORDER.to_vec(),
        ];
        let ranges = [(0.0, 100.0), (65.0, 80.0), (72.0, 72.0)];

        for regions in &region_sets {
            for buckets in &bucket_sets {
                for &(lo, hi) in &ranges {
                    let sel = FilterSelection {
                        regions: regions.iter().map(|s| s.to_string()).collect(),
                        buckets: buckets.iter().copied().collect(),
                        turnout_min: lo,
                        turnout_max: hi,
                    };
                    let expected: Vec<&ConstituencyResult> = ds
                        .rows()
                        .iter()
                        .filter(|r| {
                            regions.contains(&r.region.as_str())
                                && buckets.contains(&r.winner_bucket)
                                && r.turnout_percentage >= lo
                                && r.turnout_percentage <= hi
                        })
                        .collect();
                    match apply(ds.rows(), &sel) {
                        Ok(out) => {
                            assert!(out.iter().all(|r| sel.matches(r)));
                            assert_eq!(out.iter().collect::<Vec<_>>(), expected);
                        }
                        Err(EmptyResultError) => assert!(expected.is_empty()),
                    }
                }
            }
        }
    }

    #[test]
    fn turnout_bounds_are_inclusive() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.set_turnout_range(80.0, 65.0);
        assert_eq!(sel.turnout_min, 65.0);
        let ids: Vec<String> = apply(ds.rows(), &sel)
            .unwrap()
            .into_iter()
            .map(|r| r.constituency_id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_result_is_an_error() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.regions.clear();
        assert_eq!(apply(ds.rows(), &sel), Err(EmptyResultError));

        let mut sel = FilterSelection::all(&ds);
        sel.toggle_bucket(Bucket::Others);
        sel.set_turnout_range(90.0, 100.0);
        assert_eq!(apply(ds.rows(), &sel), Err(EmptyResultError));
    }

    #[test]
    fn filtering_does_not_touch_the_source() {
        let ds = sample();
        let before = ds.clone();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle_region("Coastal");
        let _ = apply(ds.rows(), &sel);
        assert_eq!(ds, before);
    }

    #[test]
    fn toggles_flip_membership() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle_region("Central");
        assert!(!sel.regions.contains("Central"));
        sel.toggle_region("Central");
        assert!(sel.regions.contains("Central"));
        sel.toggle_bucket(Bucket::Jds);
        assert!(!sel.buckets.contains(&Bucket::Jds));
    }

    #[test]
    fn region_subset() {
        let ds = sample();
        let coastal = rows_in_region(ds.rows(), "Coastal");
        assert_eq!(coastal.len(), 2);
        assert!(coastal.iter().all(|r| r.region == "Coastal"));
    }
}
