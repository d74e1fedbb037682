use crate::dataset::labels::LabelSet;
use crate::dataset::missing::MissingSpec;
use crate::error::{Error, Result};
use crate::value::{MissingCell, Value, ValueType};

/// The core entity: a sequence of raw values annotated with an optional
/// variable label, value labels, a missing-value convention, and a display
/// format hint.
///
/// A vector is immutable once built. Attachments happen through the
/// consuming `with_*` builders, each validating its invariant eagerly, so a
/// constructed vector is always internally consistent. Transformations such
/// as [`LabelledVector::zap_missing`] produce new vectors and never mutate
/// their input.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledVector {
    name: String,
    value_type: ValueType,
    values: Vec<Value>,
    variable_label: Option<String>,
    labels: Option<LabelSet>,
    missing: Option<MissingSpec>,
    format: Option<String>,
}

impl LabelledVector {
    /// Builds a vector from raw values, inferring the element type from the
    /// first concrete value. An all-sentinel or empty sequence defaults to
    /// numeric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVector`] when numeric and string values are
    /// mixed in one sequence.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let value_type = values
            .iter()
            .find_map(Value::value_type)
            .unwrap_or(ValueType::Numeric);
        for value in &values {
            if let Some(found) = value.value_type()
                && found != value_type
            {
                return Err(Error::vector(format!(
                    "value {value} does not match the inferred element type"
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            value_type,
            values,
            variable_label: None,
            labels: None,
            missing: None,
            format: None,
        })
    }

    /// Convenience constructor for numeric data where `None` marks the
    /// generic absence sentinel.
    ///
    /// # Errors
    ///
    /// Propagates [`LabelledVector::new`] failures (none are possible for
    /// purely numeric input, but the signature stays uniform).
    pub fn from_numbers<I>(name: impl Into<String>, numbers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = numbers
            .into_iter()
            .map(|number| {
                number.map_or(Value::Missing(MissingCell::System), Value::Number)
            })
            .collect();
        Self::new(name, values)
    }

    #[must_use]
    pub fn with_variable_label(mut self, label: impl Into<String>) -> Self {
        self.variable_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Attaches value labels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVector`] when a label key contradicts the
    /// vector's element type (tagged-sentinel keys are numeric-only), or
    /// [`Error::InvalidMissingSpec`] when a tagged-sentinel key contradicts
    /// an already attached missing convention.
    pub fn with_labels(mut self, labels: LabelSet) -> Result<Self> {
        for entry in &labels {
            match entry.value.value_type() {
                Some(found) if found != self.value_type => {
                    return Err(Error::vector(format!(
                        "label key {} does not match the vector element type",
                        entry.value
                    )));
                }
                None if self.value_type == ValueType::Text => {
                    return Err(Error::vector(
                        "absence-sentinel label keys apply to numeric vectors only",
                    ));
                }
                _ => {}
            }
        }
        check_label_keys(&labels, self.missing.as_ref())?;
        self.labels = Some(labels);
        Ok(self)
    }

    /// Attaches a missing-value convention.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMissingSpec`] when the spec contradicts the
    /// vector's values or its label keys (see [`MissingSpec`] invariants).
    pub fn with_missing(mut self, missing: MissingSpec) -> Result<Self> {
        missing.validate(self.value_type, &self.values)?;
        if let Some(labels) = &self.labels {
            check_label_keys(labels, Some(&missing))?;
        }
        self.missing = Some(missing);
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn variable_label(&self) -> Option<&str> {
        self.variable_label.as_deref()
    }

    #[must_use]
    pub const fn labels(&self) -> Option<&LabelSet> {
        self.labels.as_ref()
    }

    #[must_use]
    pub const fn missing(&self) -> Option<&MissingSpec> {
        self.missing.as_ref()
    }

    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Canonical missingness predicate for one value of this vector.
    #[must_use]
    pub fn is_missing(&self, value: &Value) -> bool {
        self.missing
            .as_ref()
            .map_or_else(|| value.is_absent(), |spec| spec.is_missing(value))
    }

    /// Missingness of the value at `index`; `None` when out of range.
    #[must_use]
    pub fn is_missing_at(&self, index: usize) -> Option<bool> {
        self.values.get(index).map(|value| self.is_missing(value))
    }

    /// One missingness flag per value.
    #[must_use]
    pub fn missing_mask(&self) -> Vec<bool> {
        self.values
            .iter()
            .map(|value| self.is_missing(value))
            .collect()
    }

    /// Tag character of the value at `index`, when it is a tagged sentinel.
    #[must_use]
    pub fn tag_at(&self, index: usize) -> Option<char> {
        self.values.get(index).and_then(Value::tag_of)
    }

    /// Presentation-boundary accessor: the label if one exists, else the
    /// value's text form, suffixed with a missingness marker when
    /// `is_missing` holds for a value that is not already a bare sentinel.
    #[must_use]
    pub fn display_string(&self, index: usize) -> Option<String> {
        let value = self.values.get(index)?;
        let label = self.labels.as_ref().and_then(|set| set.get(value));
        let base = label.map_or_else(|| value.render(), str::to_string);
        let annotate = self.is_missing(value) && (label.is_some() || !value.is_absent());
        Some(if annotate { format!("{base} (NA)") } else { base })
    }

    /// Replaces every value for which `is_missing` holds with the generic
    /// absence sentinel and removes the missing-value convention. Tag and
    /// range provenance is discarded for good; labels and the variable
    /// label survive. Idempotent.
    #[must_use]
    pub fn zap_missing(&self) -> Self {
        let values = self
            .values
            .iter()
            .map(|value| {
                if self.is_missing(value) {
                    Value::Missing(MissingCell::System)
                } else {
                    value.clone()
                }
            })
            .collect();
        Self {
            name: self.name.clone(),
            value_type: self.value_type,
            values,
            variable_label: self.variable_label.clone(),
            labels: self.labels.clone(),
            missing: None,
            format: self.format.clone(),
        }
    }

    /// Flattening boundary: reduces the vector to bare raw values for
    /// systems without attribute support. One-way and lossy — the variable
    /// label, value labels, missing convention, and format are all dropped
    /// and cannot be reconstructed from the result.
    #[must_use]
    pub fn flatten(self) -> Vec<Value> {
        self.values
    }
}

/// Tagged-sentinel label keys must agree with the vector's missing
/// convention: they never mix with discrete/range, and their tag must come
/// from the declared alphabet. Checked from both attachment directions so
/// builder order does not matter.
fn check_label_keys(labels: &LabelSet, missing: Option<&MissingSpec>) -> Result<()> {
    let Some(missing) = missing else {
        return Ok(());
    };
    for entry in labels {
        if let Value::Missing(MissingCell::Tagged(tag)) = &entry.value {
            match missing {
                MissingSpec::DiscreteAndRange { .. } => {
                    return Err(Error::missing_spec(format!(
                        "label key NA({tag}) mixes tagged missing into a vector \
                         using the discrete/range convention"
                    )));
                }
                MissingSpec::Tagged { alphabet } => {
                    if !alphabet.contains(tag) {
                        return Err(Error::missing_spec(format!(
                            "label key tag {tag:?} is outside the declared alphabet"
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::missing::MissingSpec;

    fn health() -> LabelledVector {
        LabelledVector::from_numbers("rating", [Some(0.0), Some(1.0), Some(2.0), Some(8.0)])
            .unwrap()
            .with_labels(LabelSet::from_pairs([(1.0, "Good"), (2.0, "Fair")]))
            .unwrap()
            .with_missing(MissingSpec::discrete([0.0, 8.0]))
            .unwrap()
    }

    #[test]
    fn mixed_element_types_are_rejected() {
        let err =
            LabelledVector::new("bad", vec![Value::Number(1.0), Value::from("x")]).unwrap_err();
        assert!(matches!(err, Error::InvalidVector { .. }));
    }

    #[test]
    fn tagged_label_key_rejected_under_discrete_convention() {
        let tagged_key = LabelSet::from_pairs([(
            Value::Missing(MissingCell::Tagged('a')),
            "Refused",
        )]);
        let err = LabelledVector::from_numbers("q", [Some(1.0)])
            .unwrap()
            .with_missing(MissingSpec::discrete([8.0]))
            .unwrap()
            .with_labels(tagged_key.clone())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMissingSpec { .. }));

        // The same contradiction is caught when the spec arrives second.
        let err = LabelledVector::from_numbers("q", [Some(1.0)])
            .unwrap()
            .with_labels(tagged_key)
            .unwrap()
            .with_missing(MissingSpec::discrete([8.0]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMissingSpec { .. }));
    }

    #[test]
    fn tagged_label_key_must_use_declared_alphabet() {
        let err = LabelledVector::from_numbers("q", [Some(1.0)])
            .unwrap()
            .with_missing(MissingSpec::tagged(['a', 'd']))
            .unwrap()
            .with_labels(LabelSet::from_pairs([(
                Value::Missing(MissingCell::Tagged('z')),
                "Refused",
            )]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMissingSpec { .. }));
    }

    #[test]
    fn display_string_renders_labels_and_markers() {
        let vector = health();
        assert_eq!(vector.display_string(0).as_deref(), Some("0 (NA)"));
        assert_eq!(vector.display_string(1).as_deref(), Some("Good"));
        assert_eq!(vector.display_string(2).as_deref(), Some("Fair"));
        assert_eq!(vector.display_string(4), None);
    }

    #[test]
    fn zap_missing_strips_convention_and_values() {
        let zapped = health().zap_missing();
        assert!(zapped.missing().is_none());
        assert_eq!(zapped.values()[0], Value::Missing(MissingCell::System));
        assert_eq!(zapped.values()[1], Value::Number(1.0));
        assert_eq!(zapped.values()[3], Value::Missing(MissingCell::System));
        assert!(zapped.labels().is_some());
    }

    #[test]
    fn flatten_drops_all_metadata() {
        let raw = health().flatten();
        assert_eq!(raw.len(), 4);
        assert_eq!(raw[0], Value::Number(0.0));
    }
}
