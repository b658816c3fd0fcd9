pub mod group;
pub mod name_normalizer;
pub mod normalize;

pub use group::{GroupedOperations, OperationRef, group_by_tag};
pub use normalize::normalize;
