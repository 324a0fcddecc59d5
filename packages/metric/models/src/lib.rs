#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Metric record types shared across the vital-map system.
//!
//! A [`MetricRecord`] is one row of source data: a region (e.g. a US
//! state), a reporting period (a calendar year), an optional category
//! (e.g. cause of death), a raw count, and an optional normalized rate.
//! All downstream crates — indexing, scale derivation, binding — consume
//! these types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel category for single-series datasets and all-cause rollups.
///
/// Sources without a category column get this value assigned at load
/// time, so every record carries a category and lookup keys are uniform.
pub const ALL_CATEGORY: &str = "ALL";

/// One row of source data.
///
/// `(region, period, category)` identifies at most one record in any
/// built index; when source files contain duplicates, the last record
/// encountered in input order wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// Region name the row reports on (e.g. "Alabama").
    pub region: String,
    /// Calendar year of the observation.
    pub period: i32,
    /// Metric sub-classification (cause of death), or [`ALL_CATEGORY`].
    pub category: String,
    /// Raw count (deaths, cases). Never negative.
    pub value: f64,
    /// Normalized rate (e.g. age-adjusted per 100k). `None` means the
    /// source reported no rate for this row.
    pub rate: Option<f64>,
}

impl MetricRecord {
    /// Returns the chosen field of this record, `None` when the source
    /// reported no value for it.
    #[must_use]
    pub const fn field(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::Value => Some(self.value),
            MetricField::Rate => self.rate,
        }
    }
}

/// Which numeric field of a [`MetricRecord`] a scale or view is built on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricField {
    /// The raw count column.
    Value,
    /// The normalized rate column.
    Rate,
}

impl MetricField {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Value, Self::Rate]
    }
}
