#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter and selection state machines for interactive views.
//!
//! [`filter::FilterState`] holds the active period/category pair,
//! validates mutations against the dataset's known values, and fans out
//! to subscribers synchronously. [`selection::SelectionState`] holds the
//! at-most-one selected region and owns the toggle semantics, so every
//! interaction handler goes through one implementation instead of
//! re-deriving it per view.

pub mod filter;
pub mod selection;

use thiserror::Error;

/// Errors that can occur mutating filter state.
///
/// Every variant is recoverable: the state that rejected the mutation is
/// left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The requested period is not present in the dataset.
    #[error("invalid filter value: period {0} is not in the dataset")]
    UnknownPeriod(i32),

    /// The requested category is not present in the dataset.
    #[error("invalid filter value: category {0:?} is not in the dataset")]
    UnknownCategory(String),

    /// A filter state cannot be initialized from a dataset with no
    /// periods or no categories.
    #[error("cannot initialize filter state: dataset has no {0}")]
    EmptyDomain(&'static str),
}
