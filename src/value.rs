use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A single raw cell of a labelled vector.
///
/// Concrete data values are numeric or textual; absence is represented by
/// dedicated sentinels rather than by a magic in-band value. A tagged
/// sentinel carries the one-character reason code used by SAS/Stata-style
/// missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit floating point raw value.
    Number(f64),
    /// UTF-8 string raw value.
    Text(String),
    /// Absence sentinel, optionally tagged.
    Missing(MissingCell),
}

/// Variants of absence carried inside a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingCell {
    /// The generic absence literal (`.` in SAS, `NA` in R).
    System,
    /// Absence tagged with a single reason character (`.a`-`.z` in Stata).
    Tagged(char),
}

/// Raw element type of a vector. All concrete values in one vector share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueType {
    Numeric,
    Text,
}

impl Value {
    /// Returns the tag character for tagged absence sentinels, `None` for
    /// every other value. Untagged and tagged absence are distinct values;
    /// this accessor is how callers separate tagged buckets on request.
    #[must_use]
    pub const fn tag_of(&self) -> Option<char> {
        match self {
            Self::Missing(MissingCell::Tagged(tag)) => Some(*tag),
            _ => None,
        }
    }

    /// True for any absence sentinel, tagged or not.
    ///
    /// This is *not* the user-missing predicate: values declared missing by
    /// a discrete/range specification are concrete values and return false
    /// here. Use `MissingSpec::is_missing` for the canonical check.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    /// The element type this value belongs to, if it is a concrete value.
    #[must_use]
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Number(_) => Some(ValueType::Numeric),
            Self::Text(_) => Some(ValueType::Text),
            Self::Missing(_) => None,
        }
    }

    /// Canonical text form used for level rendering and display.
    ///
    /// Numbers render without a trailing `.0` when integral; absence
    /// sentinels render as `NA` / `NA(tag)`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Number(number) => render_number(*number),
            Self::Text(text) => text.clone(),
            Self::Missing(MissingCell::System) => "NA".to_string(),
            Self::Missing(MissingCell::Tagged(tag)) => format!("NA({tag})"),
        }
    }

    /// Value identity used for label lookup and level-candidate matching.
    ///
    /// Like `==` except that NaN identifies with NaN, so a NaN observation
    /// still finds its own candidate level. Zero signs compare equal, as
    /// they do under `==`.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => {
                lhs == rhs || (lhs.is_nan() && rhs.is_nan())
            }
            _ => self == other,
        }
    }

    /// Total, deterministic ordering used when sorting levels by value:
    /// numbers first (by `total_cmp`), then text, then tagged sentinels by
    /// tag, then the generic absence literal.
    #[must_use]
    pub fn order(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => lhs.total_cmp(rhs),
            (Self::Text(lhs), Self::Text(rhs)) => lhs.cmp(rhs),
            (
                Self::Missing(MissingCell::Tagged(lhs)),
                Self::Missing(MissingCell::Tagged(rhs)),
            ) => lhs.cmp(rhs),
            _ => Ordering::Equal,
        })
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Missing(MissingCell::Tagged(_)) => 2,
            Self::Missing(MissingCell::System) => 3,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Formats a number the way the raw value would print in a data listing.
#[allow(clippy::cast_possible_truncation)]
fn render_number(number: f64) -> String {
    const INTEGRAL_LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    if number.is_finite() && number.fract() == 0.0 && number.abs() < INTEGRAL_LIMIT {
        let mut buffer = itoa::Buffer::new();
        buffer.format(number as i64).to_string()
    } else if number.is_nan() {
        "NaN".to_string()
    } else {
        let mut buffer = ryu::Buffer::new();
        buffer.format(number).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_integral_numbers_without_fraction() {
        assert_eq!(Value::Number(8.0).render(), "8");
        assert_eq!(Value::Number(-3.0).render(), "-3");
        assert_eq!(Value::Number(2.5).render(), "2.5");
    }

    #[test]
    fn renders_absence_sentinels() {
        assert_eq!(Value::Missing(MissingCell::System).render(), "NA");
        assert_eq!(Value::Missing(MissingCell::Tagged('a')).render(), "NA(a)");
    }

    #[test]
    fn order_places_sentinels_last() {
        let mut values = vec![
            Value::Missing(MissingCell::System),
            Value::Number(2.0),
            Value::Missing(MissingCell::Tagged('d')),
            Value::Number(-1.0),
            Value::Missing(MissingCell::Tagged('a')),
        ];
        values.sort_by(Value::order);
        assert_eq!(
            values,
            vec![
                Value::Number(-1.0),
                Value::Number(2.0),
                Value::Missing(MissingCell::Tagged('a')),
                Value::Missing(MissingCell::Tagged('d')),
                Value::Missing(MissingCell::System),
            ]
        );
    }

    #[test]
    fn same_as_identifies_nan_with_nan() {
        assert!(Value::Number(f64::NAN).same_as(&Value::Number(f64::NAN)));
        assert!(!Value::Number(f64::NAN).same_as(&Value::Number(1.0)));
        assert!(Value::Number(0.0).same_as(&Value::Number(-0.0)));
        assert!(Value::from("x").same_as(&Value::from("x")));
        assert!(!Value::Missing(MissingCell::Tagged('a'))
            .same_as(&Value::Missing(MissingCell::Tagged('b'))));
    }

    #[test]
    fn tag_of_distinguishes_tagged_sentinels() {
        assert_eq!(Value::Missing(MissingCell::Tagged('a')).tag_of(), Some('a'));
        assert_eq!(Value::Missing(MissingCell::System).tag_of(), None);
        assert_eq!(Value::Number(1.0).tag_of(), None);
    }
}
