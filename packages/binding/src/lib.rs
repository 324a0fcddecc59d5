#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binding controller and application model.
//!
//! [`controller::BindingController`] turns the current filter, index,
//! and selection into renderer-agnostic instructions; it is total — any
//! valid input produces an instruction, with "no data" absorbed into the
//! payload rather than surfaced as an error. [`model::ApplicationModel`]
//! is the one owned object per view that wires the pieces together and
//! translates interaction-boundary events into state mutations. Each
//! view gets its own model instance; there is no process-wide state.

pub mod controller;
pub mod model;

use thiserror::Error;

/// Errors surfaced by the application model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An operation arrived before a dataset was attached. The caller
    /// should not have offered the interaction yet; nothing to recover.
    #[error("no dataset attached: load data before interacting")]
    DataNotLoaded,

    /// Filter mutation rejected; prior state is retained.
    #[error(transparent)]
    Filter(#[from] vital_map_state::FilterError),
}
