//! CSV parser for the road quality dataset.

use std::collections::HashMap;

use chrono::Utc;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::dataset::{Dataset, RawRecord, REQUIRED_COLUMNS};
use crate::error::DataUnavailable;
use crate::fetch::read_source;

/// Decodes a CSV payload with a header row into a [`Dataset`].
///
/// # Errors
///
/// Returns [`DataUnavailable::MissingColumns`] if any required header is absent
/// and [`DataUnavailable::Csv`] if the bytes are not a consistent CSV table.
pub fn parse_dataset(bytes: &[u8], source: &str) -> Result<Dataset, DataUnavailable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers = dedupe_headers(rdr.headers()?);
    check_columns(&headers)?;

    let mut rows = Vec::new();
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result?;
        let record: RawRecord = row.deserialize(Some(&headers))?;
        records.push(record);
        rows.push(row);
    }

    debug!(rows = records.len(), columns = headers.len(), "Dataset parsed");

    Ok(Dataset {
        source: source.to_string(),
        loaded_at: Utc::now(),
        headers,
        rows,
        records,
    })
}

/// Renames repeated header names to `name.1`, `name.2`, ... so the first
/// occurrence keeps the plain name and supplies the value.
fn dedupe_headers(headers: &StringRecord) -> StringRecord {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    headers
        .iter()
        .map(|name| {
            let count = seen.entry(name).or_insert(0);
            let renamed = if *count == 0 {
                name.to_string()
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            renamed
        })
        .collect()
}

fn check_columns(headers: &StringRecord) -> Result<(), DataUnavailable> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataUnavailable::MissingColumns(missing))
    }
}

/// Fetches `source` (URL or path) and parses it.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_dataset(source: &str) -> Result<Dataset, DataUnavailable> {
    let bytes = read_source(source).await?;
    let dataset = parse_dataset(&bytes, source)?;
    info!(rows = dataset.len(), "Dataset loaded");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "refArea,State of the main roads - good,State of the main roads - acceptable,State of the main roads - bad,Existence of dedicated bus stops - exists,The main means of public transport - vans,The main means of public transport - taxis,The main means of public transport - buses";

    #[test]
    fn test_parse_valid_rows() {
        let csv = format!(
            "{HEADER}\nhttp://x/Akkar_Governorate,1,0,0,0,1,0,1\nhttp://x/Tripoli_District,N/A,,1,1,0,1,0\n"
        );
        let dataset = parse_dataset(csv.as_bytes(), "inline").unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].road_good, Some(1.0));
        assert_eq!(dataset.records[0].buses, Some(1.0));
        assert_eq!(dataset.records[1].road_good, None);
        assert_eq!(dataset.records[1].road_acceptable, None);
        assert_eq!(dataset.records[1].road_bad, Some(1.0));
        assert_eq!(dataset.rows[1].get(1), Some("N/A"));
    }

    #[test]
    fn test_parse_extra_columns_ignored() {
        let csv = format!("Observation URI,{HEADER},Town\nobs/1,http://x/A_Governorate,0.5,0.5,0,0,0,0,0,A\n");
        let dataset = parse_dataset(csv.as_bytes(), "inline").unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].road_good, Some(0.5));
        assert_eq!(dataset.headers.len(), 10);
    }

    #[test]
    fn test_parse_missing_columns() {
        let csv = "refArea,State of the main roads - good\nx,1\n";
        let err = parse_dataset(csv.as_bytes(), "inline").unwrap_err();

        match err {
            DataUnavailable::MissingColumns(cols) => {
                assert_eq!(cols.len(), 6);
                assert!(cols.contains(&"State of the main roads - bad".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_duplicate_header_keeps_first() {
        let csv = format!("{HEADER},refArea\nhttp://x/Akkar_Governorate,1,0,0,0,1,0,1,http://x/Other\n");
        let dataset = parse_dataset(csv.as_bytes(), "inline").unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].ref_area, "http://x/Akkar_Governorate");
        assert_eq!(dataset.headers.get(8), Some("refArea.1"));
    }

    #[test]
    fn test_dedupe_headers() {
        let headers = StringRecord::from(vec!["a", "b", "a", "a"]);
        let deduped = dedupe_headers(&headers);
        assert_eq!(deduped, StringRecord::from(vec!["a", "b", "a.1", "a.2"]));
    }

    #[test]
    fn test_parse_ragged_rows_fail() {
        let csv = format!("{HEADER}\nhttp://x/A_Governorate,1,0\n");
        let result = parse_dataset(csv.as_bytes(), "inline");
        assert!(matches!(result, Err(DataUnavailable::Csv(_))));
    }

    #[test]
    fn test_parse_empty_payload() {
        let result = parse_dataset(b"", "inline");
        assert!(matches!(result, Err(DataUnavailable::MissingColumns(_))));
    }

    #[test]
    fn test_parse_header_only() {
        let dataset = parse_dataset(HEADER.as_bytes(), "inline").unwrap();
        assert!(dataset.is_empty());
    }
}
