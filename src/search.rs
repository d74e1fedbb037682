use serde::Serialize;
use tracing::debug;

use crate::dataset::LabelledVector;
use crate::value::ValueType;

/// Caller-supplied matching capability. The core never compiles patterns
/// itself; case folding, whole-word policy, and regular expressions all
/// live behind this trait. Any `Fn(&str) -> bool` closure qualifies.
pub trait MetadataPattern {
    fn matches(&self, text: &str) -> bool;
}

impl<F: Fn(&str) -> bool> MetadataPattern for F {
    fn matches(&self, text: &str) -> bool {
        self(text)
    }
}

/// Literal, case-sensitive substring matcher — the default search policy.
#[derive(Debug, Clone)]
pub struct Substring {
    needle: String,
}

impl Substring {
    #[must_use]
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl MetadataPattern for Substring {
    fn matches(&self, text: &str) -> bool {
        text.contains(&self.needle)
    }
}

/// Scope of a metadata search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Also match against value labels, not only variable labels.
    pub search_values: bool,
}

impl SearchOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            search_values: false,
        }
    }

    #[must_use]
    pub const fn with_search_values(mut self, enabled: bool) -> Self {
        self.search_values = enabled;
        self
    }
}

/// One variable whose metadata matched the pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub variable: String,
    pub variable_label: Option<String>,
    pub value_type: ValueType,
    /// Value labels that matched; empty unless `search_values` was set and
    /// value labels matched.
    pub values: Vec<ValueHit>,
}

/// One matching value label: the value's text form plus its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueHit {
    pub value: String,
    pub label: String,
}

/// One row of the long report: a match flattened to one matching value
/// label per row. Variables matched only via their variable label produce
/// a single row with empty value columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub variable: String,
    pub variable_label: Option<String>,
    pub value: Option<String>,
    pub value_label: Option<String>,
}

/// Scans the vectors for variable labels (and value labels, when requested)
/// matching `pattern`. Returns one [`Match`] per hit variable in input
/// order; no match at all yields an empty vector, not an error.
pub fn look_for(
    vectors: &[LabelledVector],
    pattern: &impl MetadataPattern,
    options: &SearchOptions,
) -> Vec<Match> {
    let mut matches = Vec::new();
    for vector in vectors {
        let label_hit = vector
            .variable_label()
            .is_some_and(|label| pattern.matches(label));

        let mut values = Vec::new();
        if options.search_values
            && let Some(labels) = vector.labels()
        {
            for entry in labels {
                if pattern.matches(&entry.label) {
                    values.push(ValueHit {
                        value: entry.value.render(),
                        label: entry.label.clone(),
                    });
                }
            }
        }

        if label_hit || !values.is_empty() {
            matches.push(Match {
                variable: vector.name().to_string(),
                variable_label: vector.variable_label().map(str::to_string),
                value_type: vector.value_type(),
                values,
            });
        }
    }
    debug!(
        scanned = vectors.len(),
        matched = matches.len(),
        "metadata search finished"
    );
    matches
}

/// Expands matches into the long reporting form, one row per matching
/// value label.
#[must_use]
pub fn long_rows(matches: &[Match]) -> Vec<MatchRow> {
    let mut rows = Vec::new();
    for item in matches {
        if item.values.is_empty() {
            rows.push(MatchRow {
                variable: item.variable.clone(),
                variable_label: item.variable_label.clone(),
                value: None,
                value_label: None,
            });
        } else {
            for hit in &item.values {
                rows.push(MatchRow {
                    variable: item.variable.clone(),
                    variable_label: item.variable_label.clone(),
                    value: Some(hit.value.clone()),
                    value_label: Some(hit.label.clone()),
                });
            }
        }
    }
    rows
}
