mod dataset;
mod labels;
mod missing;
mod vector;

pub use dataset::Dataset;
pub use labels::{LabelSet, ValueLabel};
pub use missing::{DiscreteSet, MissingRange, MissingSpec};
pub use vector::LabelledVector;
