//! At-most-one-region selection state.
//!
//! Interaction handlers call [`SelectionState::toggle`] for region
//! clicks and [`SelectionState::clear`] for background clicks. `toggle`
//! is the single place the click-again-to-deselect rule lives, so
//! per-view handlers cannot drift apart on it.

/// Holds the currently selected region, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// The selected region, or `None`.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects `region`, replacing any previous selection. Plain
    /// `select` never deselects; that behavior belongs to
    /// [`toggle`](Self::toggle) alone.
    pub fn select(&mut self, region: impl Into<String>) {
        let region = region.into();
        log::debug!("select {region:?} (was {:?})", self.selected);
        self.selected = Some(region);
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        if self.selected.is_some() {
            log::debug!("clear selection {:?}", self.selected);
        }
        self.selected = None;
    }

    /// Click semantics: clicking the selected region deselects it,
    /// clicking any other region selects it.
    pub fn toggle(&mut self, region: &str) {
        if self.get() == Some(region) {
            self.clear();
        } else {
            self.select(region);
        }
    }
}
