use std::borrow::Cow;

/// Result type used across the labelled-value core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by constructors and conversions.
///
/// Every failure is detected eagerly and returned as a value; no operation
/// logs, retries, or leaves a partially applied result behind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A missing-value specification is malformed or contradicts the vector
    /// it is attached to (inverted range, tag outside the declared alphabet,
    /// mixed missing conventions, type-incompatible discrete values).
    #[error("invalid missing-value specification: {details}")]
    InvalidMissingSpec { details: Cow<'static, str> },

    /// The raw values handed to a vector constructor are inconsistent, e.g.
    /// numeric and string values mixed in one sequence.
    #[error("invalid labelled vector: {details}")]
    InvalidVector { details: Cow<'static, str> },

    /// Two level candidates render to the same text under the requested
    /// levels mode. Merging them silently would corrupt level counts, so the
    /// collision is reported instead.
    #[error("ambiguous factor level {rendered:?}: keys {first} and {second} render identically")]
    AmbiguousLevel {
        rendered: String,
        first: String,
        second: String,
    },
}

impl Error {
    pub(crate) fn missing_spec(details: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidMissingSpec {
            details: details.into(),
        }
    }

    pub(crate) fn vector(details: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidVector {
            details: details.into(),
        }
    }
}
