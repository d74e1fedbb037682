use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::dataset::LabelledVector;
use crate::error::{Error, Result};
use crate::value::{MissingCell, Value};


/// How level text is rendered from a labelled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelsMode {
    /// The label itself; unlabelled values fall through to their text form.
    #[default]
    Labels,
    /// `"<value> [<label>]"` for labelled values, the text form otherwise.
    Prefixed,
    /// The raw value's text form, ignoring labels.
    Values,
}

/// Ordering applied to the level set before codes are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelSort {
    /// By raw value, in the deterministic total order of [`Value::order`].
    #[default]
    Values,
    /// By label text (unlabelled candidates sort by their rendered text).
    Labels,
}

/// Conversion configuration. All options are independent and composable;
/// the record enumerates every recognized option with a fixed type, so no
/// invalid combination is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FactorConfig {
    pub levels_mode: LevelsMode,
    pub user_na_to_na: bool,
    pub drop_unused_labels: bool,
    pub nolabel_to_na: bool,
    pub sort_levels: LevelSort,
    pub decreasing: bool,
}

impl FactorConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            levels_mode: LevelsMode::Labels,
            user_na_to_na: false,
            drop_unused_labels: false,
            nolabel_to_na: false,
            sort_levels: LevelSort::Values,
            decreasing: false,
        }
    }

    #[must_use]
    pub const fn with_levels_mode(mut self, mode: LevelsMode) -> Self {
        self.levels_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_user_na_to_na(mut self, enabled: bool) -> Self {
        self.user_na_to_na = enabled;
        self
    }

    #[must_use]
    pub const fn with_drop_unused_labels(mut self, enabled: bool) -> Self {
        self.drop_unused_labels = enabled;
        self
    }

    #[must_use]
    pub const fn with_nolabel_to_na(mut self, enabled: bool) -> Self {
        self.nolabel_to_na = enabled;
        self
    }

    #[must_use]
    pub const fn with_sort_levels(mut self, sort: LevelSort) -> Self {
        self.sort_levels = sort;
        self
    }

    #[must_use]
    pub const fn with_decreasing(mut self, enabled: bool) -> Self {
        self.decreasing = enabled;
        self
    }
}

/// Categorical projection of a labelled vector.
///
/// Every code is either an index into `levels` or `None` for missing;
/// `levels` contains no duplicate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    pub codes: Vec<Option<u32>>,
    pub levels: Vec<String>,
}

impl Factor {
    /// Level text for the observation at `index`, `None` when missing or
    /// out of range.
    #[must_use]
    pub fn level_at(&self, index: usize) -> Option<&str> {
        let code = (*self.codes.get(index)?)?;
        self.levels.get(code as usize).map(String::as_str)
    }
}

/// Textual projection: one entry per input value, `None` for missing.
pub type CharacterVector = Vec<Option<String>>;

struct Candidate {
    key: Value,
    rendered: String,
    sort_label: String,
    count: usize,
}

/// Converts a labelled vector into a factor under `config`.
///
/// # Errors
///
/// Returns [`Error::AmbiguousLevel`] when two surviving level candidates
/// render to identical text, which would otherwise merge distinct values
/// into one bucket.
pub fn to_factor(vector: &LabelledVector, config: &FactorConfig) -> Result<Factor> {
    let mut candidates = collect_candidates(vector, config);

    for candidate in &mut candidates {
        candidate.count = vector
            .values()
            .iter()
            .filter(|value| value.same_as(&candidate.key))
            .count();
    }
    if config.drop_unused_labels {
        candidates.retain(|candidate| candidate.count > 0);
    }

    match config.sort_levels {
        LevelSort::Values => candidates.sort_by(|a, b| a.key.order(&b.key)),
        LevelSort::Labels => candidates.sort_by(|a, b| a.sort_label.cmp(&b.sort_label)),
    }
    if config.decreasing {
        candidates.reverse();
    }

    for (position, candidate) in candidates.iter().enumerate() {
        if let Some(other) = candidates[..position]
            .iter()
            .find(|earlier| earlier.rendered == candidate.rendered)
        {
            return Err(Error::AmbiguousLevel {
                rendered: candidate.rendered.clone(),
                first: other.key.render(),
                second: candidate.key.render(),
            });
        }
    }

    let codes = vector
        .values()
        .iter()
        .map(|value| assign_code(vector, config, &candidates, value))
        .collect();
    let levels: Vec<String> = candidates
        .into_iter()
        .map(|candidate| candidate.rendered)
        .collect();
    debug!(
        variable = vector.name(),
        levels = levels.len(),
        observations = vector.len(),
        "converted labelled vector to factor"
    );
    Ok(Factor { codes, levels })
}

/// Converts a labelled vector into per-value text under `config`.
/// `drop_unused_labels` and the sort options have no effect here; the
/// missingness rules match [`to_factor`].
#[must_use]
pub fn to_character(vector: &LabelledVector, config: &FactorConfig) -> CharacterVector {
    vector
        .values()
        .iter()
        .map(|value| {
            if matches!(value, Value::Missing(MissingCell::System)) {
                return None;
            }
            if config.user_na_to_na && vector.is_missing(value) {
                return None;
            }
            let label = vector.labels().and_then(|set| set.get(value));
            if label.is_none() && config.nolabel_to_na {
                return None;
            }
            Some(render_level(config.levels_mode, value, label))
        })
        .collect()
}

/// Converts many vectors in parallel, one rayon task per vector. Vectors
/// are independent immutable values, so no locking is involved; the result
/// order matches the input order.
///
/// # Errors
///
/// Returns the first [`Error::AmbiguousLevel`] encountered, in input order.
pub fn to_factor_all(vectors: &[LabelledVector], config: &FactorConfig) -> Result<Vec<Factor>> {
    let factors = vectors
        .par_iter()
        .map(|vector| to_factor(vector, config))
        .collect::<Result<Vec<_>>>()?;
    debug!(vectors = vectors.len(), "batch factor conversion finished");
    Ok(factors)
}

fn collect_candidates(vector: &LabelledVector, config: &FactorConfig) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();

    if let Some(labels) = vector.labels() {
        for entry in labels {
            if matches!(entry.value, Value::Missing(MissingCell::System)) {
                continue;
            }
            if config.user_na_to_na && vector.is_missing(&entry.value) {
                continue;
            }
            candidates.push(Candidate {
                rendered: render_level(config.levels_mode, &entry.value, Some(&entry.label)),
                sort_label: entry.label.clone(),
                key: entry.value.clone(),
                count: 0,
            });
        }
    }

    if !config.nolabel_to_na {
        for value in vector.values() {
            if matches!(value, Value::Missing(MissingCell::System)) {
                continue;
            }
            if config.user_na_to_na && vector.is_missing(value) {
                continue;
            }
            if vector.labels().is_some_and(|set| set.contains(value)) {
                continue;
            }
            if candidates.iter().any(|candidate| candidate.key.same_as(value)) {
                continue;
            }
            candidates.push(Candidate {
                rendered: value.render(),
                sort_label: value.render(),
                key: value.clone(),
                count: 0,
            });
        }
    }

    candidates
}

fn assign_code(
    vector: &LabelledVector,
    config: &FactorConfig,
    candidates: &[Candidate],
    value: &Value,
) -> Option<u32> {
    if matches!(value, Value::Missing(MissingCell::System)) {
        return None;
    }
    if config.user_na_to_na && vector.is_missing(value) {
        return None;
    }
    if config.nolabel_to_na && !vector.labels().is_some_and(|set| set.contains(value)) {
        return None;
    }
    candidates
        .iter()
        .position(|candidate| candidate.key.same_as(value))
        .and_then(|position| u32::try_from(position).ok())
}

fn render_level(mode: LevelsMode, value: &Value, label: Option<&str>) -> String {
    match (mode, label) {
        (LevelsMode::Labels, Some(label)) => label.to_string(),
        (LevelsMode::Prefixed, Some(label)) => format!("{} [{label}]", value.render()),
        (LevelsMode::Values, _) | (_, None) => value.render(),
    }
}
