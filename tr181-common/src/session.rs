//! Lookup session state
//!
//! A [`Session`] is owned by the application and holds everything a lookup needs between user
//! actions: the loaded model, the current query, the filtered results, and the selection. Every
//! setter that changes the query re-runs the filter, so [`Session::results`] always reflects the
//! current criteria.
use log::info;
use snafu::Snafu;
use std::path::Path;

use crate::{
    access::AccessFilter,
    filter::Query,
    model::{DataModel, LoadError, NameJoin},
};

/// Error returned when selecting result rows
#[derive(Debug, Snafu, PartialEq, Eq, Clone, Copy)]
pub enum SelectionError {
    /// A row index is past the end of the current results
    #[snafu(display("Row {index} is out of range; {len} results are shown"))]
    OutOfRange {
        /// The offending row
        index: usize,
        /// The number of rows in the current results
        len: usize,
    },
}

/// Search state for one user session
#[derive(Debug, Default)]
pub struct Session {
    model: Option<DataModel>,
    query: Query,
    join: NameJoin,
    /// Positions in the model's entries which match the query
    results: Vec<usize>,
    /// Sorted positions in `results`
    selection: Vec<usize>,
}

impl Session {
    /// Create an unloaded session starting with the given query
    pub fn new(query: Query) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    /// Set the name join policy used by subsequent [`Session::open`] calls
    pub fn with_name_join(mut self, join: NameJoin) -> Self {
        self.join = join;
        self
    }

    /// Load a definition file, replacing the current model
    ///
    /// On error the session is left exactly as it was.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<&DataModel, LoadError> {
        let model = DataModel::load_with(path, self.join)?;
        info!("Opened {} with {} entries", model.source(), model.len());
        Ok(self.set_model(model))
    }

    /// Replace the current model with one loaded elsewhere
    pub fn set_model(&mut self, model: DataModel) -> &DataModel {
        self.results = self.query.positions(model.entries());
        self.selection.clear();
        self.model.insert(model)
    }

    /// The loaded model, if any
    pub fn model(&self) -> Option<&DataModel> {
        self.model.as_ref()
    }

    /// The current query
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Change the search text and re-filter
    pub fn set_text(&mut self, text: impl Into<String>) -> Vec<&str> {
        self.query.set_text(text);
        self.refresh();
        self.results()
    }

    /// Change case sensitivity and re-filter
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> Vec<&str> {
        self.query.set_case_sensitive(case_sensitive);
        self.refresh();
        self.results()
    }

    /// Change the access constraint and re-filter
    pub fn set_access_filter(&mut self, access_filter: AccessFilter) -> Vec<&str> {
        self.query.set_access_filter(access_filter);
        self.refresh();
        self.results()
    }

    fn refresh(&mut self) {
        self.results = match &self.model {
            Some(model) => self.query.positions(model.entries()),
            None => Vec::new(),
        };
        self.selection.clear();
    }

    /// Qualified names matching the current query, in document order
    ///
    /// Empty while no model is loaded.
    pub fn results(&self) -> Vec<&str> {
        match &self.model {
            Some(model) => self
                .results
                .iter()
                .map(|&i| model.entries()[i].qualified_name())
                .collect(),
            None => Vec::new(),
        }
    }

    /// The number of results
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// The number of entries in the loaded model, or 0
    pub fn total_count(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.len())
    }

    /// Select result rows by position, replacing any previous selection
    ///
    /// Duplicate rows are collapsed. If any row is out of range, nothing changes.
    pub fn select(&mut self, rows: &[usize]) -> Result<(), SelectionError> {
        let len = self.results.len();
        if let Some(&index) = rows.iter().find(|&&row| row >= len) {
            return OutOfRangeSnafu { index, len }.fail();
        }
        let mut selection = rows.to_vec();
        selection.sort_unstable();
        selection.dedup();
        self.selection = selection;
        Ok(())
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected names, in result order
    pub fn selected(&self) -> Vec<&str> {
        let results = self.results();
        self.selection.iter().map(|&row| results[row]).collect()
    }

    /// Selected names as newline separated text, for export
    pub fn selection_text(&self) -> String {
        self.selected().join("\n")
    }
}
