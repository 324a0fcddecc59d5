#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Renderer-agnostic instruction payloads.
//!
//! The binding core never touches a rendering surface; it emits these
//! plain data descriptions of what should be displayed. A renderer (SVG,
//! canvas, terminal, test harness) consumes them however it likes. All
//! types serialize as camelCase JSON, colors as CSS hex strings.

use serde::{Deserialize, Serialize};
use vital_map_metric_models::MetricField;
use vital_map_scale::Rgb;

/// How one region should be painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPaint {
    /// Region identifier (the dataset's region name).
    pub region_id: String,
    /// Fill color.
    pub color: Rgb,
    /// `false` means the region had no record under the active filter
    /// and `color` is the neutral placeholder — renderers must show it
    /// distinctly from a low value.
    pub has_data: bool,
}

/// A full repaint of the view for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInstruction {
    /// Period the paint reflects.
    pub period: i32,
    /// Category the paint reflects.
    pub category: String,
    /// Which metric field drove the colors.
    pub field: MetricField,
    /// One entry per known region, in sorted region order.
    pub regions: Vec<RegionPaint>,
    /// Legend accompanying this paint.
    pub legend: LegendInstruction,
}

/// Which single region to highlight, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightInstruction {
    /// The selected region, or `None` to clear any highlight.
    pub selected_region_id: Option<String>,
}

/// What the info panel should show for the current selection.
///
/// "No data" is a first-class outcome, not an omission: a selected
/// region with no record under the active filter gets an explicit
/// instruction so the panel can say so instead of going stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InfoPanelInstruction {
    /// The selection resolved to a record under the current filter.
    Record {
        /// Selected region.
        region_id: String,
        /// Period of the record.
        period: i32,
        /// Category of the record.
        category: String,
        /// Raw count.
        value: f64,
        /// Normalized rate, if the source reported one.
        rate: Option<f64>,
    },
    /// The selection has no record under the current filter.
    NoData {
        /// Selected region.
        region_id: String,
        /// Period that was active.
        period: i32,
        /// Category that was active.
        category: String,
    },
}

/// Legend description: the active scale's domain, its color stops, and
/// human-formatted tick labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendInstruction {
    /// Lower domain endpoint.
    pub domain_min: f64,
    /// Upper domain endpoint.
    pub domain_max: f64,
    /// Ramp stops, start to end.
    pub stops: Vec<Rgb>,
    /// Evenly spaced ticks across the domain.
    pub ticks: Vec<LegendTick>,
}

/// One legend tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendTick {
    /// Tick position in domain units.
    pub value: f64,
    /// Compact label (`850`, `500K`, `1.2M`).
    pub label: String,
}

/// Formats a count the way the legend labels it: millions as `M`,
/// thousands as `K`, smaller values plain, fractional parts trimmed to
/// one decimal.
#[must_use]
pub fn format_count(value: f64) -> String {
    fn compact(scaled: f64, suffix: &str) -> String {
        let rounded = (scaled * 10.0).round() / 10.0;
        if (rounded - rounded.trunc()).abs() < f64::EPSILON {
            format!("{}{suffix}", rounded.trunc())
        } else {
            format!("{rounded:.1}{suffix}")
        }
    }

    let magnitude = value.abs();
    if !value.is_finite() {
        return String::from("n/a");
    }
    if magnitude >= 1_000_000.0 {
        compact(value / 1_000_000.0, "M")
    } else if magnitude >= 1_000.0 {
        compact(value / 1_000.0, "K")
    } else {
        compact(value, "")
    }
}
