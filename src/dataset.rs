//! In-memory form of the road quality / public transport table.

use chrono::{DateTime, Utc};
use csv::StringRecord;
use serde::{Deserialize, Deserializer, Serialize};

pub const REF_AREA: &str = "refArea";
pub const ROAD_GOOD: &str = "State of the main roads - good";
pub const ROAD_ACCEPTABLE: &str = "State of the main roads - acceptable";
pub const ROAD_BAD: &str = "State of the main roads - bad";
pub const BUS_STOPS: &str = "Existence of dedicated bus stops - exists";
pub const TRANSPORT_VANS: &str = "The main means of public transport - vans";
pub const TRANSPORT_TAXIS: &str = "The main means of public transport - taxis";
pub const TRANSPORT_BUSES: &str = "The main means of public transport - buses";

/// Header names the loader refuses to proceed without.
pub const REQUIRED_COLUMNS: &[&str] = &[
    REF_AREA,
    ROAD_GOOD,
    ROAD_ACCEPTABLE,
    ROAD_BAD,
    BUS_STOPS,
    TRANSPORT_VANS,
    TRANSPORT_TAXIS,
    TRANSPORT_BUSES,
];

/// One town/area row. Numeric cells that are empty or non-numeric decode to
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "refArea")]
    pub ref_area: String,

    #[serde(rename = "State of the main roads - good", default, deserialize_with = "lenient_f64")]
    pub road_good: Option<f64>,
    #[serde(rename = "State of the main roads - acceptable", default, deserialize_with = "lenient_f64")]
    pub road_acceptable: Option<f64>,
    #[serde(rename = "State of the main roads - bad", default, deserialize_with = "lenient_f64")]
    pub road_bad: Option<f64>,

    #[serde(rename = "Existence of dedicated bus stops - exists", default, deserialize_with = "lenient_f64")]
    pub bus_stops: Option<f64>,
    #[serde(rename = "The main means of public transport - vans", default, deserialize_with = "lenient_f64")]
    pub vans: Option<f64>,
    #[serde(rename = "The main means of public transport - taxis", default, deserialize_with = "lenient_f64")]
    pub taxis: Option<f64>,
    #[serde(rename = "The main means of public transport - buses", default, deserialize_with = "lenient_f64")]
    pub buses: Option<f64>,
}

impl RawRecord {
    /// Human-readable name from the last segment of `refArea`.
    pub fn area_label(&self) -> String {
        area_label(&self.ref_area)
    }

    /// The Area Label, only when it names a governorate.
    pub fn governorate_label(&self) -> Option<String> {
        let label = self.area_label();
        label.contains("Governorate").then_some(label)
    }
}

/// Last `/`-separated segment of `ref_area` with underscores turned into
/// spaces.
pub fn area_label(ref_area: &str) -> String {
    ref_area
        .rsplit('/')
        .next()
        .unwrap_or(ref_area)
        .replace('_', " ")
}

/// Parses a cell as a number, treating anything unparsable as missing.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_numeric))
}

/// The table as loaded once per session. Never mutated after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
    pub records: Vec<RawRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header names and the first `limit` rows exactly as they appeared in
    /// the payload.
    pub fn preview(&self, limit: usize) -> RawPreview {
        RawPreview {
            headers: self.headers.iter().map(str::to_string).collect(),
            rows: self
                .rows
                .iter()
                .take(limit)
                .map(|r| r.iter().map(str::to_string).collect())
                .collect(),
            total_rows: self.rows.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RawPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}
