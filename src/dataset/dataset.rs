use crate::dataset::vector::LabelledVector;
use crate::search::{self, Match, MetadataPattern, SearchOptions};

/// An ordered collection of labelled vectors, the unit handed over by file
/// and database readers and the scope over which metadata search runs.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub name: Option<String>,
    pub columns: Vec<LabelledVector>,
}

impl Dataset {
    #[must_use]
    pub const fn new(columns: Vec<LabelledVector>) -> Self {
        Self {
            name: None,
            columns,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&LabelledVector> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Searches this dataset's variable (and optionally value) labels.
    #[must_use]
    pub fn look_for(&self, pattern: &impl MetadataPattern, options: &SearchOptions) -> Vec<Match> {
        search::look_for(&self.columns, pattern, options)
    }
}
