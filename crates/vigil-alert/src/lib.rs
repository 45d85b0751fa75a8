//! Trigger evaluation for computed metrics.
//!
//! A [`trigger::Trigger`] is a threshold condition of one of nine kinds,
//! owned by an alert. [`evaluator::evaluate_trigger`] is the stateless
//! decision for a single value, and [`engine::AlertEngine`] runs one full
//! evaluation cycle: a transform chain followed by every trigger against
//! each resulting metric's latest value.

pub mod engine;
pub mod evaluator;
pub mod trigger;
