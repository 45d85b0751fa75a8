use crate::Transform;
use crate::args::require_metrics;
use crate::registry::FunctionName;
use crate::transforms::result_metric;
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::{Metric, TimeSeries};

/// Spread between the largest and smallest value.
///
/// Given one metric, the result holds that metric's minimum and maximum
/// datapoints. Given several, it holds `max - min` at every timestamp common
/// to all of them. Nulls count as 0.
pub struct RangeTransform;

impl RangeTransform {
    fn extremes(datapoints: &TimeSeries) -> TimeSeries {
        let mut min: Option<(i64, Number)> = None;
        let mut max: Option<(i64, Number)> = None;
        for (ts, value) in datapoints.iter() {
            let value = value.unwrap_or(Number::ZERO);
            if min.is_none_or(|(_, low)| value < low) {
                min = Some((ts, value));
            }
            if max.is_none_or(|(_, high)| value > high) {
                max = Some((ts, value));
            }
        }
        min.into_iter().chain(max).collect()
    }

    fn spread(metrics: &[Metric]) -> TimeSeries {
        let Some((first, rest)) = metrics.split_first() else {
            return TimeSeries::new();
        };
        first
            .datapoints
            .timestamps()
            .filter(|ts| rest.iter().all(|m| m.datapoints.contains(*ts)))
            .map(|ts| {
                let mut values = metrics
                    .iter()
                    .map(|m| m.datapoints.get(ts).flatten().unwrap_or(Number::ZERO));
                let seed = values.next().unwrap_or(Number::ZERO);
                let (low, high) = values.fold((seed, seed), |(low, high), v| (low.min(v), high.max(v)));
                (ts, high - low)
            })
            .collect()
    }
}

impl Transform for RangeTransform {
    fn name(&self) -> &'static str {
        FunctionName::Range.as_str()
    }

    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        let datapoints = match metrics {
            [single] => Self::extremes(&single.datapoints),
            _ => Self::spread(metrics),
        };
        Ok(vec![result_metric(metrics, self.name(), datapoints)])
    }

    fn transform_with(&self, metrics: &[Metric], _constants: &[String]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        Err(EngineError::unsupported("RANGE does not accept constants"))
    }
}
