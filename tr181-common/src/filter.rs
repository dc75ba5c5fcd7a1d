//! Query filtering of flattened parameter lists
//!
//! Filtering is a pure function of the entry list and the query; it never fails, and re-applying
//! the same query to its own output changes nothing.
use crate::access::AccessFilter;
use crate::model::ParameterEntry;

/// Filter entries by substring and access kind
///
/// The access constraint is applied first, then `query` is tested as a substring of each
/// qualified name. When `case_sensitive` is false both sides are lower-cased before comparison. An
/// empty query matches every entry. Output keeps input order.
pub fn filter<'a>(
    entries: &'a [ParameterEntry],
    query: &str,
    case_sensitive: bool,
    access_filter: AccessFilter,
) -> Vec<&'a str> {
    Query::new(query)
        .with_case_sensitive(case_sensitive)
        .with_access_filter(access_filter)
        .apply(entries)
}

/// The full set of search criteria
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    text: String,
    case_sensitive: bool,
    access_filter: AccessFilter,
}

impl Query {
    /// Create a case-insensitive query with no access constraint
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for case sensitivity
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Builder-style setter for the access constraint
    pub fn with_access_filter(mut self, access_filter: AccessFilter) -> Self {
        self.access_filter = access_filter;
        self
    }

    /// The search text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the substring test preserves case
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// The access constraint
    pub fn access_filter(&self) -> AccessFilter {
        self.access_filter
    }

    /// Replace the search text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Set case sensitivity
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    /// Set the access constraint
    pub fn set_access_filter(&mut self, access_filter: AccessFilter) {
        self.access_filter = access_filter;
    }

    /// Returns true if a single entry passes every criterion
    pub fn matches(&self, entry: &ParameterEntry) -> bool {
        self.matcher().matches(entry)
    }

    /// Names of all matching entries, in input order
    pub fn apply<'a>(&self, entries: &'a [ParameterEntry]) -> Vec<&'a str> {
        let matcher = self.matcher();
        entries
            .iter()
            .filter(|e| matcher.matches(e))
            .map(|e| e.qualified_name())
            .collect()
    }

    /// Positions of all matching entries, in input order
    pub fn positions(&self, entries: &[ParameterEntry]) -> Vec<usize> {
        let matcher = self.matcher();
        entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matcher.matches(e))
            .map(|(i, _)| i)
            .collect()
    }

    fn matcher(&self) -> Matcher<'_> {
        if self.case_sensitive {
            Matcher::Exact(&self.text, self.access_filter)
        } else {
            Matcher::Folded(self.text.to_lowercase(), self.access_filter)
        }
    }
}

/// A query prepared for repeated matching; the folded needle is lower-cased once
enum Matcher<'q> {
    Exact(&'q str, AccessFilter),
    Folded(String, AccessFilter),
}

impl Matcher<'_> {
    fn matches(&self, entry: &ParameterEntry) -> bool {
        match self {
            Matcher::Exact(needle, access) => {
                access.admits(entry.access()) && entry.qualified_name().contains(*needle)
            }
            Matcher::Folded(needle, access) => {
                access.admits(entry.access())
                    && entry.qualified_name().to_lowercase().contains(needle.as_str())
            }
        }
    }
}
