#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region/period/category lookup index over metric records.
//!
//! [`RegionIndex`] nests `region → period → category → record`. Building
//! one is a pure transformation of the raw record set: it never fails,
//! and a key that is absent simply means "no data" to consumers. A
//! category change rebuilds the index from the same immutable records
//! rather than mutating a published structure in place, so readers never
//! observe a half-rebuilt index.

use std::collections::BTreeMap;

use vital_map_metric_models::MetricRecord;

/// Nested lookup from `region → period → category → record`.
///
/// Duplicate `(region, period, category)` keys in the input resolve to
/// the last record encountered in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionIndex {
    regions: BTreeMap<String, BTreeMap<i32, BTreeMap<String, MetricRecord>>>,
}

impl RegionIndex {
    /// Builds an index over `records`, keeping only records whose
    /// category matches `category_filter` when one is supplied.
    #[must_use]
    pub fn build(records: &[MetricRecord], category_filter: Option<&str>) -> Self {
        let mut regions: BTreeMap<String, BTreeMap<i32, BTreeMap<String, MetricRecord>>> =
            BTreeMap::new();

        for record in records {
            if let Some(filter) = category_filter
                && record.category != filter
            {
                continue;
            }
            regions
                .entry(record.region.clone())
                .or_default()
                .entry(record.period)
                .or_default()
                .insert(record.category.clone(), record.clone());
        }

        Self { regions }
    }

    /// Looks up the record for an exact `(region, period, category)` key.
    #[must_use]
    pub fn get(&self, region: &str, period: i32, category: &str) -> Option<&MetricRecord> {
        self.regions.get(region)?.get(&period)?.get(category)
    }

    /// Returns all region names present in the index, in sorted order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Collects the records visible under a `(period, category)` slice:
    /// at most one record per region. Regions with no record for the
    /// slice are simply absent from the result.
    #[must_use]
    pub fn slice(&self, period: i32, category: &str) -> Vec<&MetricRecord> {
        self.regions
            .values()
            .filter_map(|periods| periods.get(&period)?.get(category))
            .collect()
    }

    /// `true` when the index holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
