//! Validated period/category filter state with synchronous fan-out.

use std::collections::BTreeSet;

use vital_map_metric_models::ALL_CATEGORY;

use crate::FilterError;

/// The currently active `(period, category)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    /// Active calendar year.
    pub period: i32,
    /// Active category name.
    pub category: String,
}

type Subscriber = Box<dyn FnMut(&FilterSelection)>;

/// Holds the active filter and the known value sets it validates
/// against.
///
/// Mutations go through [`set_period`](Self::set_period) and
/// [`set_category`](Self::set_category) only. A successful mutation
/// notifies every subscriber exactly once, synchronously, in
/// registration order; a rejected mutation leaves both the state and the
/// subscribers untouched.
pub struct FilterState {
    known_periods: BTreeSet<i32>,
    known_categories: BTreeSet<String>,
    current: FilterSelection,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for FilterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterState")
            .field("current", &self.current)
            .field("known_periods", &self.known_periods.len())
            .field("known_categories", &self.known_categories.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl FilterState {
    /// Creates filter state over the dataset's known periods and
    /// categories, initialized to the latest period and the default
    /// category.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyDomain`] when either set is empty.
    pub fn new(
        known_periods: BTreeSet<i32>,
        known_categories: BTreeSet<String>,
    ) -> Result<Self, FilterError> {
        let latest = *known_periods
            .iter()
            .next_back()
            .ok_or(FilterError::EmptyDomain("periods"))?;
        // Prefer the all-cause rollup when the dataset has one,
        // otherwise the alphabetically first category.
        let category = if known_categories.contains(ALL_CATEGORY) {
            ALL_CATEGORY.to_string()
        } else {
            known_categories
                .iter()
                .next()
                .ok_or(FilterError::EmptyDomain("categories"))?
                .clone()
        };

        Ok(Self {
            known_periods,
            known_categories,
            current: FilterSelection {
                period: latest,
                category,
            },
            subscribers: Vec::new(),
        })
    }

    /// The active filter pair.
    #[must_use]
    pub const fn get(&self) -> &FilterSelection {
        &self.current
    }

    /// All periods this state accepts, in ascending order.
    #[must_use]
    pub const fn known_periods(&self) -> &BTreeSet<i32> {
        &self.known_periods
    }

    /// All categories this state accepts, in lexicographic order.
    #[must_use]
    pub const fn known_categories(&self) -> &BTreeSet<String> {
        &self.known_categories
    }

    /// Registers a callback invoked synchronously, once, after every
    /// successful mutation, in registration order.
    pub fn subscribe(&mut self, callback: impl FnMut(&FilterSelection) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Switches the active period.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownPeriod`] for a period outside the
    /// known set; the active filter is left unchanged and no subscriber
    /// runs.
    pub fn set_period(&mut self, period: i32) -> Result<(), FilterError> {
        if !self.known_periods.contains(&period) {
            return Err(FilterError::UnknownPeriod(period));
        }
        log::debug!("filter period {} -> {period}", self.current.period);
        self.current.period = period;
        self.notify();
        Ok(())
    }

    /// Switches the active category.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownCategory`] for a category outside
    /// the known set; the active filter is left unchanged and no
    /// subscriber runs.
    pub fn set_category(&mut self, category: &str) -> Result<(), FilterError> {
        if !self.known_categories.contains(category) {
            return Err(FilterError::UnknownCategory(category.to_string()));
        }
        log::debug!("filter category {:?} -> {category:?}", self.current.category);
        self.current.category = category.to_string();
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn state(periods: &[i32], categories: &[&str]) -> FilterState {
        FilterState::new(
            periods.iter().copied().collect(),
            categories.iter().map(ToString::to_string).collect(),
        )
        .unwrap()
    }

    #[test]
    fn initializes_to_latest_period() {
        let s = state(&[2019, 2021, 2020], &["Cancer"]);
        assert_eq!(s.get().period, 2021);
    }

    #[test]
    fn prefers_all_category_when_present() {
        let s = state(&[2020], &["Cancer", "ALL", "Stroke"]);
        assert_eq!(s.get().category, "ALL");
    }

    #[test]
    fn falls_back_to_first_category_alphabetically() {
        let s = state(&[2020], &["Stroke", "Cancer"]);
        assert_eq!(s.get().category, "Cancer");
    }

    #[test]
    fn empty_domains_are_rejected() {
        assert_eq!(
            FilterState::new(BTreeSet::new(), BTreeSet::from(["x".to_string()])).unwrap_err(),
            FilterError::EmptyDomain("periods")
        );
        assert_eq!(
            FilterState::new(BTreeSet::from([2020]), BTreeSet::new()).unwrap_err(),
            FilterError::EmptyDomain("categories")
        );
    }

    #[test]
    fn unknown_period_leaves_state_unchanged() {
        let mut s = state(&[2019, 2020], &["ALL"]);
        let notified = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&notified);
        s.subscribe(move |_| *counter.borrow_mut() += 1);

        assert_eq!(s.set_period(1999).unwrap_err(), FilterError::UnknownPeriod(1999));
        assert_eq!(s.get().period, 2020);
        assert_eq!(*notified.borrow(), 0);
    }

    #[test]
    fn unknown_category_leaves_state_unchanged() {
        let mut s = state(&[2020], &["ALL", "Cancer"]);

        let err = s.set_category("Heart Disease").unwrap_err();
        assert_eq!(err, FilterError::UnknownCategory("Heart Disease".to_string()));
        assert_eq!(s.get().category, "ALL");
    }

    #[test]
    fn subscribers_run_once_per_mutation_in_registration_order() {
        let mut s = state(&[2019, 2020], &["ALL"]);
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&order);
        s.subscribe(move |f| first.borrow_mut().push(("first", f.period)));
        let second = Rc::clone(&order);
        s.subscribe(move |f| second.borrow_mut().push(("second", f.period)));

        s.set_period(2019).unwrap();

        assert_eq!(
            order.borrow().as_slice(),
            &[("first", 2019), ("second", 2019)]
        );
    }

    #[test]
    fn valid_category_switch_notifies_with_new_state() {
        let mut s = state(&[2020], &["ALL", "Cancer"]);
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&seen);
        s.subscribe(move |f| sink.borrow_mut().clone_from(&f.category));

        s.set_category("Cancer").unwrap();
        assert_eq!(*seen.borrow(), "Cancer");
    }
}
