use crate::value::Value;

/// Insertion-ordered mapping from raw values to human-readable labels.
///
/// Keys are unique; inserting an existing key replaces its label in place so
/// the original position survives. A value without an entry is simply
/// unlabelled, never an error. Tagged absence sentinels are legal keys,
/// which is how Stata-style labelled tagged missings are represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelSet {
    labels: Vec<ValueLabel>,
}

/// One entry of a [`LabelSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub value: Value,
    pub label: String,
}

impl LabelSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Builds a set from `(value, label)` pairs, later pairs replacing
    /// earlier ones with the same key.
    #[must_use]
    pub fn from_pairs<I, V, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, S)>,
        V: Into<Value>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (value, label) in pairs {
            set.insert(value.into(), label.into());
        }
        set
    }

    /// Inserts or replaces the label for `value`. Key identity follows
    /// [`Value::same_as`], so a NaN key has one entry like any other value.
    pub fn insert(&mut self, value: Value, label: impl Into<String>) {
        let label = label.into();
        if let Some(existing) = self
            .labels
            .iter_mut()
            .find(|entry| entry.value.same_as(&value))
        {
            existing.label = label;
        } else {
            self.labels.push(ValueLabel { value, label });
        }
    }

    /// Looks up the label for a raw value.
    #[must_use]
    pub fn get(&self, value: &Value) -> Option<&str> {
        self.labels
            .iter()
            .find(|entry| entry.value.same_as(value))
            .map(|entry| entry.label.as_str())
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.get(value).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueLabel> {
        self.labels.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a ValueLabel;
    type IntoIter = std::slice::Iter<'a, ValueLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut set = LabelSet::from_pairs([(1.0, "Good"), (2.0, "Fair")]);
        set.insert(Value::Number(1.0), "Great");
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&Value::Number(1.0)), Some("Great"));
        let order: Vec<&str> = set.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(order, vec!["Great", "Fair"]);
    }

    #[test]
    fn absent_key_is_unlabelled() {
        let set = LabelSet::from_pairs([(1.0, "Good")]);
        assert_eq!(set.get(&Value::Number(9.0)), None);
    }
}
