use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::value::{MissingCell, Value, ValueType};

/// Inline capacity for discrete missing sets; SPSS allows at most three
/// discrete user-missing values per variable.
pub type DiscreteSet = SmallVec<[Value; 4]>;

/// Missing-value convention attached to a vector. Exactly one variant per
/// vector; the two conventions are never mixed.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingSpec {
    /// SPSS-style user-defined missing: a set of discrete concrete values
    /// plus at most one numeric range. Both parts may be empty, meaning no
    /// user missing is configured.
    DiscreteAndRange {
        discrete: DiscreteSet,
        range: Option<MissingRange>,
    },
    /// SAS/Stata-style tagged missing: absence sentinels carry one tag
    /// character drawn from this alphabet (case-sensitive).
    Tagged { alphabet: BTreeSet<char> },
}

/// Inclusive numeric range of user-missing values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingRange {
    pub low: f64,
    pub high: f64,
}

impl MissingRange {
    /// # Errors
    ///
    /// Returns [`Error::InvalidMissingSpec`] when `low > high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if low > high {
            return Err(Error::missing_spec(format!(
                "missing range is inverted: low {low} > high {high}"
            )));
        }
        Ok(Self { low, high })
    }

    #[must_use]
    pub fn contains(&self, number: f64) -> bool {
        self.low <= number && number <= self.high
    }
}

impl MissingSpec {
    /// Discrete user-missing values with no range.
    #[must_use]
    pub fn discrete<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::DiscreteAndRange {
            discrete: values.into_iter().map(Into::into).collect(),
            range: None,
        }
    }

    /// Discrete user-missing values plus an inclusive numeric range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMissingSpec`] when the range is inverted.
    pub fn discrete_and_range<I, V>(values: I, low: f64, high: f64) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Ok(Self::DiscreteAndRange {
            discrete: values.into_iter().map(Into::into).collect(),
            range: Some(MissingRange::new(low, high)?),
        })
    }

    /// Tagged-missing convention over the given alphabet.
    #[must_use]
    pub fn tagged<I: IntoIterator<Item = char>>(alphabet: I) -> Self {
        Self::Tagged {
            alphabet: alphabet.into_iter().collect(),
        }
    }

    /// Canonical missingness predicate.
    ///
    /// Absence sentinels are always missing, independent of the spec. Under
    /// `DiscreteAndRange` a concrete value is additionally missing when it
    /// is a member of the discrete set or falls inside the range. Note that
    /// such a value still compares unequal to the absence literal; equality
    /// against `Value::Missing(MissingCell::System)` must never be used as
    /// a missingness test.
    #[must_use]
    pub fn is_missing(&self, value: &Value) -> bool {
        if value.is_absent() {
            return true;
        }
        match self {
            Self::DiscreteAndRange { discrete, range } => {
                if discrete.iter().any(|entry| entry.same_as(value)) {
                    return true;
                }
                match (value, range) {
                    (Value::Number(number), Some(range)) => range.contains(*number),
                    _ => false,
                }
            }
            Self::Tagged { .. } => false,
        }
    }

    /// Validates this spec against the element type and contents of the
    /// vector it is being attached to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMissingSpec`] when a discrete value or range
    /// contradicts the vector's element type, when a tagged sentinel
    /// appears under the discrete/range convention, when a tagged spec is
    /// attached to a text vector, or when a sentinel carries a tag outside
    /// the declared alphabet.
    pub(crate) fn validate(&self, value_type: ValueType, values: &[Value]) -> Result<()> {
        match self {
            Self::DiscreteAndRange { discrete, range } => {
                for entry in discrete {
                    match entry.value_type() {
                        Some(entry_type) if entry_type == value_type => {}
                        Some(_) => {
                            return Err(Error::missing_spec(format!(
                                "discrete missing value {entry} does not match the \
                                 vector element type"
                            )));
                        }
                        None => {
                            return Err(Error::missing_spec(
                                "absence sentinels cannot appear in a discrete missing set",
                            ));
                        }
                    }
                }
                if range.is_some() && value_type == ValueType::Text {
                    return Err(Error::missing_spec(
                        "missing ranges apply to numeric vectors only",
                    ));
                }
                for value in values {
                    if let Value::Missing(MissingCell::Tagged(tag)) = value {
                        return Err(Error::missing_spec(format!(
                            "tagged sentinel NA({tag}) found in a vector using the \
                             discrete/range convention"
                        )));
                    }
                }
                Ok(())
            }
            Self::Tagged { alphabet } => {
                if value_type == ValueType::Text {
                    return Err(Error::missing_spec(
                        "tagged missing applies to numeric vectors only",
                    ));
                }
                for value in values {
                    if let Value::Missing(MissingCell::Tagged(tag)) = value
                        && !alphabet.contains(tag)
                    {
                        return Err(Error::missing_spec(format!(
                            "tag {tag:?} is outside the declared alphabet"
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_is_rejected() {
        let err = MissingRange::new(10.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidMissingSpec { .. }));
    }

    #[test]
    fn discrete_and_range_membership() {
        let spec = MissingSpec::discrete_and_range([99.0], 900.0, 999.0).unwrap();
        assert!(spec.is_missing(&Value::Number(99.0)));
        assert!(spec.is_missing(&Value::Number(950.0)));
        assert!(spec.is_missing(&Value::Number(900.0)));
        assert!(spec.is_missing(&Value::Number(999.0)));
        assert!(!spec.is_missing(&Value::Number(1.0)));
    }

    #[test]
    fn sentinels_are_always_missing() {
        let spec = MissingSpec::discrete([8.0]);
        assert!(spec.is_missing(&Value::Missing(MissingCell::System)));
        let tagged = MissingSpec::tagged(['a']);
        assert!(tagged.is_missing(&Value::Missing(MissingCell::Tagged('a'))));
        assert!(tagged.is_missing(&Value::Missing(MissingCell::System)));
    }

    #[test]
    fn tagged_spec_leaves_concrete_values_alone() {
        let spec = MissingSpec::tagged(['a', 'd']);
        assert!(!spec.is_missing(&Value::Number(0.0)));
    }

    #[test]
    fn out_of_alphabet_tag_fails_validation() {
        let spec = MissingSpec::tagged(['a']);
        let values = vec![Value::Missing(MissingCell::Tagged('z'))];
        let err = spec.validate(ValueType::Numeric, &values).unwrap_err();
        assert!(matches!(err, Error::InvalidMissingSpec { .. }));
    }

    #[test]
    fn mixed_conventions_fail_validation() {
        let spec = MissingSpec::discrete([8.0]);
        let values = vec![Value::Missing(MissingCell::Tagged('a'))];
        assert!(spec.validate(ValueType::Numeric, &values).is_err());
    }
}
