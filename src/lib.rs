pub mod config;
pub mod error;
pub mod grades;
pub mod normalize;
pub mod strokes;
// cmd and reports belong to the binary (main.rs).

pub use grades::{calculate, calculate_with, GradeResult};
pub use normalize::{normalize, NormalizedName, Normalizer};
pub use strokes::StrokeTable;
