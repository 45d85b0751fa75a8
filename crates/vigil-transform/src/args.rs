use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::Metric;

pub(crate) fn require_metrics(metrics: &[Metric], function: &str) -> Result<()> {
    if metrics.is_empty() {
        return Err(EngineError::invalid_argument(format!(
            "{function} cannot transform an empty metric list"
        )));
    }
    Ok(())
}

pub(crate) fn require_constants(constants: &[String], expected: usize, function: &str) -> Result<()> {
    if constants.len() != expected {
        return Err(EngineError::invalid_argument(format!(
            "{function} requires exactly {expected} constant(s), got {}",
            constants.len()
        )));
    }
    Ok(())
}

/// Parses a numeric constant, reporting failures against `function`.
pub(crate) fn parse_constant(function: &str, constant: &str) -> Result<Number> {
    Number::parse_constant(constant).map_err(|_| EngineError::invalid_constant(function, constant))
}
