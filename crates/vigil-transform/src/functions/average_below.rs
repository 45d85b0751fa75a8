use crate::Transform;
use crate::args::{parse_constant, require_constants, require_metrics};
use crate::registry::FunctionName;
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::{Metric, TimeSeries};

/// Keeps the metrics whose mean is strictly below a constant.
///
/// The mean is the sum of the non-null values divided by the number of
/// datapoints, nulls included. A metric with no datapoints has no mean and
/// is dropped.
pub struct AverageBelowTransform;

impl AverageBelowTransform {
    fn mean(datapoints: &TimeSeries) -> Result<Option<Number>> {
        if datapoints.is_empty() {
            return Ok(None);
        }
        let sum: Number = datapoints.values().sum();
        sum.divide(Number::Int(datapoints.len() as i64)).map(Some)
    }
}

impl Transform for AverageBelowTransform {
    fn name(&self) -> &'static str {
        FunctionName::AverageBelow.as_str()
    }

    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        Err(EngineError::unsupported(
            "AVERAGEBELOW cannot be used without a constant",
        ))
    }

    fn transform_with(&self, metrics: &[Metric], constants: &[String]) -> Result<Vec<Metric>> {
        let function = self.name();
        require_metrics(metrics, function)?;
        require_constants(constants, 1, function)?;
        let limit = parse_constant(function, &constants[0])?;

        let mut result = Vec::with_capacity(metrics.len());
        for metric in metrics {
            if let Some(mean) = Self::mean(&metric.datapoints)? {
                if mean < limit {
                    result.push(metric.clone());
                }
            }
        }
        Ok(result)
    }
}
