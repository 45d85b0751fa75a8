//! Concrete transform functions, one file per function.

pub mod average;
pub mod average_below;
pub mod below;
pub mod cull_below;
pub mod range;
pub mod scale;
pub mod zippers;
