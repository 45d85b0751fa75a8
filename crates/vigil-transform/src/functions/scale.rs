use crate::args::{parse_constant, require_constants};
use crate::registry::FunctionName;
use crate::{ValueMapping, ValueReducer, ValueReducerOrMapping};
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::TimeSeries;

/// Multiplication: the product across series, or every datapoint of one
/// series times a constant.
pub struct ScaleValueReducerOrMapping;

impl ValueReducer for ScaleValueReducerOrMapping {
    fn name(&self) -> &'static str {
        FunctionName::Scale.as_str()
    }

    /// Nulls are skipped; an empty or all-null slot list yields 1.
    fn reduce(&self, values: &[Option<Number>]) -> Result<Number> {
        Ok(values.iter().flatten().copied().product())
    }
}

impl ValueMapping for ScaleValueReducerOrMapping {
    fn name(&self) -> &'static str {
        FunctionName::Scale.as_str()
    }

    fn mapping(&self, _datapoints: &TimeSeries) -> Result<TimeSeries> {
        Err(EngineError::unsupported(
            "SCALE as a mapping needs a constant multiplicand",
        ))
    }

    fn mapping_with(&self, datapoints: &TimeSeries, constants: &[String]) -> Result<TimeSeries> {
        let function = FunctionName::Scale.as_str();
        require_constants(constants, 1, function)?;
        let multiplicand = parse_constant(function, &constants[0])?;

        // Null datapoints stay null
        Ok(datapoints
            .iter()
            .map(|(ts, value)| (ts, value.map(|v| v * multiplicand)))
            .collect())
    }
}

impl ValueReducerOrMapping for ScaleValueReducerOrMapping {}
