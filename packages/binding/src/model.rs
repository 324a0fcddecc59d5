//! The per-view application model.
//!
//! One [`ApplicationModel`] is instantiated per view and owns every
//! piece of mutable state: the attached dataset, the category-scoped
//! index, filter state, and selection state. Interaction handlers call
//! the four event methods; each runs to completion on the caller's
//! thread and returns the instructions the renderer should apply.
//! Attaching a dataset replaces the previous one wholesale — a
//! superseded load is dropped, never queued.

use vital_map_binding_models::{HighlightInstruction, InfoPanelInstruction, RenderInstruction};
use vital_map_dataset::Dataset;
use vital_map_index::RegionIndex;
use vital_map_metric_models::MetricField;
use vital_map_scale::ColorRamp;
use vital_map_state::filter::FilterState;
use vital_map_state::selection::SelectionState;

use crate::ModelError;
use crate::controller::BindingController;

/// Everything that only exists once data has arrived.
struct LoadedView {
    dataset: Dataset,
    index: RegionIndex,
    filter: FilterState,
    selection: SelectionState,
}

fn paint(controller: &BindingController, view: &LoadedView) -> RenderInstruction {
    controller.on_filter_changed(view.filter.get(), &view.index, view.dataset.regions())
}

fn selection_instructions(
    controller: &BindingController,
    view: &LoadedView,
) -> (HighlightInstruction, Option<InfoPanelInstruction>) {
    controller.on_selection_changed(&view.selection, view.filter.get(), &view.index)
}

/// Owns the model state for one view and translates interaction events
/// into instructions.
///
/// Until [`attach`](Self::attach) succeeds, every event method fails
/// fast with [`ModelError::DataNotLoaded`]; callers are expected not to
/// have offered the interaction yet.
pub struct ApplicationModel {
    controller: BindingController,
    loaded: Option<LoadedView>,
}

impl std::fmt::Debug for ApplicationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationModel")
            .field("controller", &self.controller)
            .field("loaded", &self.loaded.is_some())
            .finish()
    }
}

impl ApplicationModel {
    /// Creates a model painting `field` through `ramp`, with no dataset
    /// attached yet.
    #[must_use]
    pub const fn new(field: MetricField, ramp: ColorRamp) -> Self {
        Self {
            controller: BindingController::new(field, ramp),
            loaded: None,
        }
    }

    /// Attaches a dataset, replacing any previous one, and resets the
    /// filter to its defaults (latest period, all-cause or first
    /// category) and the selection to empty. Returns the initial paint.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Filter`] when the dataset has no periods or
    /// no categories to initialize the filter from.
    pub fn attach(&mut self, dataset: Dataset) -> Result<RenderInstruction, ModelError> {
        let mut filter = FilterState::new(dataset.periods().clone(), dataset.categories().clone())?;
        filter.subscribe(|selection| {
            log::debug!(
                "filter committed: period={} category={:?}",
                selection.period,
                selection.category,
            );
        });

        let index = RegionIndex::build(dataset.records(), Some(&filter.get().category));

        log::info!(
            "dataset attached: {} records, {} regions, periods {:?}..{:?}",
            dataset.len(),
            dataset.regions().len(),
            dataset.periods().iter().next(),
            dataset.periods().iter().next_back(),
        );

        let view = LoadedView {
            dataset,
            index,
            filter,
            selection: SelectionState::new(),
        };
        let instruction = paint(&self.controller, &view);
        self.loaded = Some(view);
        Ok(instruction)
    }

    /// `true` once a dataset is attached.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The attached dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DataNotLoaded`] before [`attach`](Self::attach).
    pub fn dataset(&self) -> Result<&Dataset, ModelError> {
        let view = self.loaded.as_ref().ok_or(ModelError::DataNotLoaded)?;
        Ok(&view.dataset)
    }

    /// Handles a period slider change.
    ///
    /// # Errors
    ///
    /// [`ModelError::DataNotLoaded`] before attach;
    /// [`ModelError::Filter`] for a period outside the dataset, in which
    /// case no instruction is emitted and the prior filter stands.
    pub fn period_changed(&mut self, period: i32) -> Result<RenderInstruction, ModelError> {
        let view = self.loaded.as_mut().ok_or(ModelError::DataNotLoaded)?;
        view.filter.set_period(period)?;
        Ok(paint(&self.controller, view))
    }

    /// Handles a category dropdown change. Rebuilds the region index
    /// from the immutable raw records scoped to the new category; the
    /// previous index is replaced only once the rebuild completes.
    ///
    /// # Errors
    ///
    /// [`ModelError::DataNotLoaded`] before attach;
    /// [`ModelError::Filter`] for a category outside the dataset, in
    /// which case no instruction is emitted and the prior filter stands.
    pub fn category_changed(&mut self, category: &str) -> Result<RenderInstruction, ModelError> {
        let view = self.loaded.as_mut().ok_or(ModelError::DataNotLoaded)?;
        view.filter.set_category(category)?;
        view.index = RegionIndex::build(view.dataset.records(), Some(category));
        Ok(paint(&self.controller, view))
    }

    /// Handles a click on a region shape: toggles the selection and
    /// describes the resulting highlight and info panel.
    ///
    /// # Errors
    ///
    /// [`ModelError::DataNotLoaded`] before attach. Clicking an unknown
    /// region is not an error; it selects a region that will simply
    /// resolve to the no-data panel.
    pub fn region_clicked(
        &mut self,
        region: &str,
    ) -> Result<(HighlightInstruction, Option<InfoPanelInstruction>), ModelError> {
        let view = self.loaded.as_mut().ok_or(ModelError::DataNotLoaded)?;
        view.selection.toggle(region);
        Ok(selection_instructions(&self.controller, view))
    }

    /// Handles a click on empty background: clears the selection.
    ///
    /// # Errors
    ///
    /// [`ModelError::DataNotLoaded`] before attach.
    pub fn background_clicked(
        &mut self,
    ) -> Result<(HighlightInstruction, Option<InfoPanelInstruction>), ModelError> {
        let view = self.loaded.as_mut().ok_or(ModelError::DataNotLoaded)?;
        view.selection.clear();
        Ok(selection_instructions(&self.controller, view))
    }

    /// Recomputes the paint for the current filter without mutating
    /// anything.
    ///
    /// # Errors
    ///
    /// [`ModelError::DataNotLoaded`] before attach.
    pub fn render(&self) -> Result<RenderInstruction, ModelError> {
        let view = self.loaded.as_ref().ok_or(ModelError::DataNotLoaded)?;
        Ok(paint(&self.controller, view))
    }

    /// The currently selected region, if any.
    ///
    /// # Errors
    ///
    /// [`ModelError::DataNotLoaded`] before attach.
    pub fn selected_region(&self) -> Result<Option<&str>, ModelError> {
        let view = self.loaded.as_ref().ok_or(ModelError::DataNotLoaded)?;
        Ok(view.selection.get())
    }
}
