pub mod error;
pub mod number;
pub mod types;
