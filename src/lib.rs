//! Core data model for labelled statistical vectors.
//!
//! A [`LabelledVector`] carries raw values together with the metadata
//! statistical packages attach to them: an optional variable label, value
//! labels, a display format hint, and one of two incompatible missing-value
//! conventions (SPSS-style discrete/range, SAS/Stata-style tagged). The
//! conversion engine projects such vectors into factors or plain text under
//! a composable configuration, and the metadata search scans collections of
//! vectors for matching labels.
//!
//! The crate performs no I/O. File-format decoders and database fetchers
//! construct vectors at one boundary; printers and table builders consume
//! conversion results at the other.

pub mod convert;
pub mod dataset;
pub mod error;
pub mod search;
pub mod value;

pub use crate::convert::{
    CharacterVector, Factor, FactorConfig, LevelSort, LevelsMode, to_character, to_factor,
    to_factor_all,
};
pub use crate::dataset::{Dataset, LabelSet, LabelledVector, MissingRange, MissingSpec, ValueLabel};
pub use crate::error::{Error, Result};
pub use crate::search::{
    Match, MatchRow, MetadataPattern, SearchOptions, Substring, ValueHit, long_rows, look_for,
};
pub use crate::value::{MissingCell, Value, ValueType};
