use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::loader::REQUIRED_COLUMNS;
use crate::data::model::ConstituencyResult;

/// `<dataset-name>_filtered_view.csv`
pub fn export_file_name(dataset_name: &str) -> String {
    format!("{dataset_name}_filtered_view.csv")
}

/// Write rows as UTF-8 CSV with the canonical header. `Winner` carries the
/// normalized bucket and `Winner_Party` the raw party label.
pub fn write_csv<W: Write>(rows: &[ConstituencyResult], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        // serialize() emits the header lazily, so write it by hand.
        wtr.write_record(REQUIRED_COLUMNS).context("writing CSV header")?;
    }
    for row in rows {
        wtr.serialize(row).context("serializing CSV row")?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

pub fn to_csv_bytes(rows: &[ConstituencyResult]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

pub fn export_to_path(rows: &[ConstituencyResult], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(rows, file)?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;
    use crate::data::model::Bucket;

    fn rows() -> Vec<ConstituencyResult> {
        vec![
            ConstituencyResult {
                constituency_id: "101".to_string(),
                constituency_name: "Udupi, North".to_string(),
                winner_name: "A \"Quoted\" Name".to_string(),
                winner_party: "Indian National Congress".to_string(),
                winner_bucket: Bucket::Inc,
                region: "Coastal".to_string(),
                margin: 1830,
                turnout_percentage: 78.35,
                seats: 1,
            },
            ConstituencyResult {
                constituency_id: "102".to_string(),
                constituency_name: "Hubli".to_string(),
                winner_name: "B".to_string(),
                winner_party: "Independent".to_string(),
                winner_bucket: Bucket::Others,
                region: "Bombay Karnataka".to_string(),
                margin: 0,
                turnout_percentage: 72.0,
                seats: 2,
            },
        ]
    }

    #[test]
    fn file_name_convention() {
        assert_eq!(export_file_name("karnataka_2023"), "karnataka_2023_filtered_view.csv");
    }

    #[test]
    fn header_is_canonical_and_bucket_normalized() {
        let bytes = to_csv_bytes(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), REQUIRED_COLUMNS.join(","));
        let first = lines.next().unwrap();
        assert!(first.contains(",Indian National Congress,INC,Coastal,1830,78.35,1"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn export_reloads_to_same_rows() {
        let original = rows();
        let bytes = to_csv_bytes(&original).unwrap();
        let reloaded = load_reader("reloaded", bytes.as_slice()).unwrap();
        assert_eq!(reloaded.rows(), original.as_slice());
    }

    #[test]
    fn empty_export_still_has_header() {
        let text = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), REQUIRED_COLUMNS.join(","));
    }

    #[test]
    fn export_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name("t"));
        export_to_path(&rows(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Constituency_ID,"));
    }
}
