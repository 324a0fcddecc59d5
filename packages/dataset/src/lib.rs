#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV dataset loading and known-value derivation.
//!
//! The loader is the external collaborator the core model assumes:
//! it turns a flat CSV file into an immutable [`Dataset`] — the decoded
//! record vector plus the sorted sets of regions, periods, and
//! categories actually present, which filter state validates against.
//!
//! Loading is tolerant at the row level: a row missing its region or
//! period is skipped with a warning rather than failing the whole file.
//! Missing the column entirely is a structural error.

pub mod loader;
pub mod parsing;

use std::collections::BTreeSet;

use thiserror::Error;
use vital_map_metric_models::MetricRecord;

/// Errors that can occur loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// CSV reading or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing from the header row.
    #[error("missing required column: no header matching {name:?}")]
    MissingColumn {
        /// Canonical name of the missing column.
        name: &'static str,
    },
}

/// An immutable, fully decoded dataset.
///
/// Holds the raw record vector in input order (duplicate keys are kept;
/// index construction resolves them last-write-wins) and the derived
/// known-value sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<MetricRecord>,
    regions: BTreeSet<String>,
    periods: BTreeSet<i32>,
    categories: BTreeSet<String>,
}

impl Dataset {
    /// Wraps an already decoded record vector, deriving the known-value
    /// sets.
    #[must_use]
    pub fn from_records(records: Vec<MetricRecord>) -> Self {
        let mut regions = BTreeSet::new();
        let mut periods = BTreeSet::new();
        let mut categories = BTreeSet::new();
        for record in &records {
            regions.insert(record.region.clone());
            periods.insert(record.period);
            categories.insert(record.category.clone());
        }
        Self {
            records,
            regions,
            periods,
            categories,
        }
    }

    /// All records, in input order.
    #[must_use]
    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// Distinct region names, sorted.
    #[must_use]
    pub const fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    /// Distinct periods, ascending.
    #[must_use]
    pub const fn periods(&self) -> &BTreeSet<i32> {
        &self.periods
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub const fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
