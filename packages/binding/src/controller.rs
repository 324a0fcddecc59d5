//! Pure instruction derivation from model state.
//!
//! The controller holds only view configuration (metric field, ramp,
//! neutral color, tick count). Each `on_*` method is a pure function of
//! its arguments: recompute the visible subset, rescale, describe. It
//! never touches a rendering surface and never fails.

use std::collections::BTreeSet;

use vital_map_binding_models::{
    HighlightInstruction, InfoPanelInstruction, LegendInstruction, LegendTick, RegionPaint,
    RenderInstruction, format_count,
};
use vital_map_index::RegionIndex;
use vital_map_metric_models::MetricField;
use vital_map_scale::{ColorRamp, LinearScale, Rgb, derive_scale};
use vital_map_state::filter::FilterSelection;
use vital_map_state::selection::SelectionState;

/// Neutral fill for regions with no record under the active filter.
const NO_DATA_COLOR: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

/// Ticks per legend, endpoints included.
const LEGEND_TICKS: usize = 5;

/// Derives render/highlight/info-panel instructions from model state.
#[derive(Debug, Clone)]
pub struct BindingController {
    field: MetricField,
    ramp: ColorRamp,
    no_data_color: Rgb,
}

impl BindingController {
    /// Creates a controller painting `field` through `ramp`.
    #[must_use]
    pub const fn new(field: MetricField, ramp: ColorRamp) -> Self {
        Self {
            field,
            ramp,
            no_data_color: NO_DATA_COLOR,
        }
    }

    /// Overrides the neutral color used for regions without data.
    #[must_use]
    pub const fn with_no_data_color(mut self, color: Rgb) -> Self {
        self.no_data_color = color;
        self
    }

    /// The metric field this controller paints.
    #[must_use]
    pub const fn field(&self) -> MetricField {
        self.field
    }

    /// Recomputes the full paint for the active filter: one entry per
    /// known region, colored through a scale derived from the currently
    /// visible subset.
    #[must_use]
    pub fn on_filter_changed(
        &self,
        filter: &FilterSelection,
        index: &RegionIndex,
        known_regions: &BTreeSet<String>,
    ) -> RenderInstruction {
        let visible = index.slice(filter.period, &filter.category);
        let scale = derive_scale(&visible, self.field, self.ramp.clone());

        let regions = known_regions
            .iter()
            .map(|region| {
                let value = index
                    .get(region, filter.period, &filter.category)
                    .and_then(|record| record.field(self.field));
                match value {
                    Some(v) => RegionPaint {
                        region_id: region.clone(),
                        color: scale.color(v),
                        has_data: true,
                    },
                    None => RegionPaint {
                        region_id: region.clone(),
                        color: self.no_data_color,
                        has_data: false,
                    },
                }
            })
            .collect();

        log::debug!(
            "repaint: period={} category={:?} visible={}/{}",
            filter.period,
            filter.category,
            visible.len(),
            known_regions.len(),
        );

        RenderInstruction {
            period: filter.period,
            category: filter.category.clone(),
            field: self.field,
            regions,
            legend: legend_for(&scale),
        }
    }

    /// Describes the highlight and info panel for the current selection.
    ///
    /// No selection means no panel. A selection without a record under
    /// the active filter gets an explicit no-data panel, never a
    /// silently dropped one.
    #[must_use]
    pub fn on_selection_changed(
        &self,
        selection: &SelectionState,
        filter: &FilterSelection,
        index: &RegionIndex,
    ) -> (HighlightInstruction, Option<InfoPanelInstruction>) {
        let highlight = HighlightInstruction {
            selected_region_id: selection.get().map(ToString::to_string),
        };

        let panel = selection.get().map(|region| {
            index
                .get(region, filter.period, &filter.category)
                .map_or_else(
                    || InfoPanelInstruction::NoData {
                        region_id: region.to_string(),
                        period: filter.period,
                        category: filter.category.clone(),
                    },
                    |record| InfoPanelInstruction::Record {
                        region_id: record.region.clone(),
                        period: record.period,
                        category: record.category.clone(),
                        value: record.value,
                        rate: record.rate,
                    },
                )
        });

        (highlight, panel)
    }
}

fn legend_for(scale: &LinearScale) -> LegendInstruction {
    let min = scale.domain_min();
    let max = scale.domain_max();
    let span = max - min;
    #[allow(clippy::cast_precision_loss)]
    let step = span / (LEGEND_TICKS - 1) as f64;

    let ticks = (0..LEGEND_TICKS)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let value = min + step * i as f64;
            LegendTick {
                value,
                label: format_count(value),
            }
        })
        .collect();

    LegendInstruction {
        domain_min: min,
        domain_max: max,
        stops: scale.ramp().stops().to_vec(),
        ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vital_map_metric_models::{ALL_CATEGORY, MetricRecord};

    fn record(region: &str, period: i32, value: f64) -> MetricRecord {
        MetricRecord {
            region: region.to_string(),
            period,
            category: ALL_CATEGORY.to_string(),
            value,
            rate: None,
        }
    }

    fn filter(period: i32) -> FilterSelection {
        FilterSelection {
            period,
            category: ALL_CATEGORY.to_string(),
        }
    }

    fn controller() -> BindingController {
        BindingController::new(MetricField::Value, ColorRamp::white_red())
    }

    #[test]
    fn paints_domain_extremes_with_ramp_endpoints() {
        let records = vec![
            record("Alabama", 2020, 10.0),
            record("Alabama", 2021, 20.0),
            record("Wyoming", 2020, 5.0),
        ];
        let index = RegionIndex::build(&records, None);
        let known: BTreeSet<String> =
            ["Alabama", "Wyoming"].iter().map(ToString::to_string).collect();

        let paint = controller().on_filter_changed(&filter(2020), &index, &known);

        // Visible subset is Alabama:10, Wyoming:5, so the domain is [5, 10].
        assert!((paint.legend.domain_min - 5.0).abs() < f64::EPSILON);
        assert!((paint.legend.domain_max - 10.0).abs() < f64::EPSILON);

        let ramp = ColorRamp::white_red();
        let alabama = &paint.regions[0];
        let wyoming = &paint.regions[1];
        assert_eq!(alabama.color, ramp.stops()[1]);
        assert_eq!(wyoming.color, ramp.stops()[0]);
        assert!(alabama.has_data && wyoming.has_data);
    }

    #[test]
    fn regions_without_records_get_the_neutral_color() {
        let records = vec![record("Alabama", 2020, 10.0)];
        let index = RegionIndex::build(&records, None);
        let known: BTreeSet<String> =
            ["Alabama", "Wyoming"].iter().map(ToString::to_string).collect();

        let paint = controller().on_filter_changed(&filter(2020), &index, &known);
        let wyoming = paint
            .regions
            .iter()
            .find(|p| p.region_id == "Wyoming")
            .unwrap();

        assert!(!wyoming.has_data);
        assert_eq!(wyoming.color, NO_DATA_COLOR);
    }

    #[test]
    fn record_without_the_painted_field_counts_as_no_data() {
        // Rate view over a record that only has a raw count.
        let records = vec![record("Alabama", 2020, 10.0)];
        let index = RegionIndex::build(&records, None);
        let known: BTreeSet<String> = ["Alabama".to_string()].into_iter().collect();

        let rate_controller = BindingController::new(MetricField::Rate, ColorRamp::white_red());
        let paint = rate_controller.on_filter_changed(&filter(2020), &index, &known);

        assert!(!paint.regions[0].has_data);
    }

    #[test]
    fn empty_subset_still_produces_a_total_paint() {
        let index = RegionIndex::build(&[], None);
        let known: BTreeSet<String> = ["Alabama".to_string()].into_iter().collect();

        let paint = controller().on_filter_changed(&filter(2020), &index, &known);

        assert_eq!(paint.regions.len(), 1);
        assert!((paint.legend.domain_min - 0.0).abs() < f64::EPSILON);
        assert!((paint.legend.domain_max - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn legend_ticks_span_the_domain_with_compact_labels() {
        let records = vec![
            record("Alabama", 2020, 1_000_000.0),
            record("Wyoming", 2020, 0.0),
        ];
        let index = RegionIndex::build(&records, None);
        let known: BTreeSet<String> =
            ["Alabama", "Wyoming"].iter().map(ToString::to_string).collect();

        let paint = controller().on_filter_changed(&filter(2020), &index, &known);
        let labels: Vec<&str> = paint.legend.ticks.iter().map(|t| t.label.as_str()).collect();

        assert_eq!(labels, vec!["0", "250K", "500K", "750K", "1M"]);
    }

    #[test]
    fn selection_with_record_yields_record_panel() {
        let records = vec![record("Alabama", 2020, 10.0)];
        let index = RegionIndex::build(&records, None);
        let mut selection = SelectionState::new();
        selection.select("Alabama");

        let (highlight, panel) =
            controller().on_selection_changed(&selection, &filter(2020), &index);

        assert_eq!(highlight.selected_region_id.as_deref(), Some("Alabama"));
        assert!(matches!(
            panel,
            Some(InfoPanelInstruction::Record { region_id, .. }) if region_id == "Alabama"
        ));
    }

    #[test]
    fn selection_without_record_yields_explicit_no_data_panel() {
        let records = vec![record("Alabama", 2020, 10.0)];
        let index = RegionIndex::build(&records, None);
        let mut selection = SelectionState::new();
        selection.select("Alabama");

        // Filter moved to a period the selection has no record for.
        let (_, panel) = controller().on_selection_changed(&selection, &filter(1999), &index);

        assert!(matches!(
            panel,
            Some(InfoPanelInstruction::NoData { period: 1999, .. })
        ));
    }

    #[test]
    fn cleared_selection_yields_no_panel() {
        let index = RegionIndex::build(&[], None);
        let selection = SelectionState::new();

        let (highlight, panel) =
            controller().on_selection_changed(&selection, &filter(2020), &index);

        assert_eq!(highlight.selected_region_id, None);
        assert!(panel.is_none());
    }
}
