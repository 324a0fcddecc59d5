//! CSV loader.
//!
//! Resolves flexible column headers (the mortality exports say
//! `State,Year,Cause Name,Deaths,Age-adjusted Death Rate`; the case-count
//! exports say `date,new_confirmed`) to canonical fields, then decodes
//! row by row, salvaging what it can.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use vital_map_metric_models::{ALL_CATEGORY, MetricRecord};

use crate::parsing::{normalize_header, parse_date_year, parse_period, parse_rate, parse_value};
use crate::{Dataset, DatasetError};

const REGION_ALIASES: &[&str] = &["region", "state", "state_name", "jurisdiction"];
const PERIOD_ALIASES: &[&str] = &["period", "year"];
const DATE_ALIASES: &[&str] = &["date"];
const CATEGORY_ALIASES: &[&str] = &["category", "cause", "cause_name"];
const VALUE_ALIASES: &[&str] = &["value", "deaths", "count", "cases", "new_confirmed"];
const RATE_ALIASES: &[&str] = &["rate", "age_adjusted_death_rate", "death_rate"];

/// Resolved column positions for one file.
#[derive(Debug, Clone, Copy)]
struct Columns {
    region: usize,
    period: Option<usize>,
    date: Option<usize>,
    category: Option<usize>,
    value: usize,
    rate: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| {
            normalized
                .iter()
                .position(|h| aliases.contains(&h.as_str()))
        };

        let region = find(REGION_ALIASES).ok_or(DatasetError::MissingColumn { name: "region" })?;
        let value = find(VALUE_ALIASES).ok_or(DatasetError::MissingColumn { name: "value" })?;
        let period = find(PERIOD_ALIASES);
        let date = find(DATE_ALIASES);
        if period.is_none() && date.is_none() {
            return Err(DatasetError::MissingColumn { name: "period" });
        }

        Ok(Self {
            region,
            period,
            date,
            category: find(CATEGORY_ALIASES),
            value,
            rate: find(RATE_ALIASES),
        })
    }
}

/// Loads a dataset from a CSV file on disk.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file cannot be opened, the CSV is
/// structurally unreadable, or a required column is missing. Individual
/// malformed rows are skipped with a warning, not errors.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = load_csv_reader(file)?;
    log::info!(
        "loaded {} records from {}: {} regions, {} periods, {} categories",
        dataset.len(),
        path.display(),
        dataset.regions().len(),
        dataset.periods().len(),
        dataset.categories().len(),
    );
    Ok(dataset)
}

/// Loads a dataset from any CSV byte stream.
///
/// # Errors
///
/// Same failure modes as [`load_csv`], minus file I/O.
pub fn load_csv_reader(reader: impl Read) -> Result<Dataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::resolve(csv_reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped: u64 = 0;

    for (line, row) in csv_reader.records().enumerate() {
        let row = row?;
        match decode_row(&columns, &row) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                // Header is line 1, so data rows start at line 2.
                log::warn!("skipping row {}: missing region or period", line + 2);
            }
        }
    }

    if skipped > 0 {
        log::warn!("{skipped} rows skipped");
    }

    Ok(Dataset::from_records(records))
}

fn decode_row(columns: &Columns, row: &StringRecord) -> Option<MetricRecord> {
    let region = row.get(columns.region)?.trim();
    if region.is_empty() {
        return None;
    }

    let period = columns
        .period
        .and_then(|i| row.get(i))
        .and_then(parse_period)
        .or_else(|| {
            columns
                .date
                .and_then(|i| row.get(i))
                .and_then(parse_date_year)
        })?;

    let category = columns
        .category
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(ALL_CATEGORY);

    Some(MetricRecord {
        region: region.to_string(),
        period,
        category: category.to_string(),
        value: parse_value(row.get(columns.value)),
        rate: columns.rate.and_then(|i| parse_rate(row.get(i))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_mortality_style_headers() {
        let csv = "\
State,Year,Cause Name,Deaths,Age-adjusted Death Rate
Alabama,2017,Heart Disease,12154,223.3
Alaska,2017,Heart Disease,855,127.5
";
        let dataset = load_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.region, "Alabama");
        assert_eq!(first.period, 2017);
        assert_eq!(first.category, "Heart Disease");
        assert!((first.value - 12154.0).abs() < f64::EPSILON);
        assert_eq!(first.rate, Some(223.3));
    }

    #[test]
    fn loads_case_count_style_headers_with_date_column() {
        let csv = "\
state,date,new_confirmed
Ohio,2021-01-12,4821
Ohio,2021-01-13,-20
";
        let dataset = load_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].period, 2021);
        assert_eq!(dataset.records()[0].category, ALL_CATEGORY);
        // Negative counts clamp to zero.
        assert!((dataset.records()[1].value - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_rows_missing_region_or_period() {
        let csv = "\
state,year,deaths
,2017,100
Vermont,not-a-year,50
Vermont,2017,50
";
        let dataset = load_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].region, "Vermont");
    }

    #[test]
    fn missing_region_column_is_a_structural_error() {
        let csv = "year,deaths\n2017,100\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { name: "region" }));
    }

    #[test]
    fn missing_period_and_date_columns_is_a_structural_error() {
        let csv = "state,deaths\nVermont,100\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { name: "period" }));
    }

    #[test]
    fn duplicate_keys_are_kept_in_input_order() {
        let csv = "\
state,year,deaths
Vermont,2017,50
Vermont,2017,60
";
        let dataset = load_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert!((dataset.records()[1].value - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_rate_is_none_not_zero() {
        let csv = "\
state,year,deaths,rate
Vermont,2017,50,
";
        let dataset = load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].rate, None);
    }
}
