use crate::ValueReducer;
use crate::registry::FunctionName;
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;

/// Arithmetic mean across series.
///
/// Nulls contribute no mass but still count toward the width, so
/// `[2, null]` averages to 1. A slot list with no non-null value has no
/// mean and is rejected.
pub struct AverageValueReducer;

impl ValueReducer for AverageValueReducer {
    fn name(&self) -> &'static str {
        FunctionName::Average.as_str()
    }

    fn reduce(&self, values: &[Option<Number>]) -> Result<Number> {
        let mut present = values.iter().flatten().peekable();
        if present.peek().is_none() {
            return Err(EngineError::invalid_argument(
                "AVERAGE needs at least one non-null value",
            ));
        }
        let sum: Number = present.sum();
        sum.divide(Number::Int(values.len() as i64))
    }
}
