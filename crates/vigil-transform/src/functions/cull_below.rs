use crate::ValueMapping;
use crate::args::{parse_constant, require_constants};
use crate::percentile::percentile;
use crate::registry::FunctionName;
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::TimeSeries;

const PERCENTILE: &str = "percentile";
const VALUE: &str = "value";

/// Drops every datapoint strictly below a pivot.
///
/// Constants are `(limit, mode)`. In `value` mode the pivot is the limit
/// itself; in `percentile` mode it is the limit-th percentile of the
/// series' values (see [`crate::percentile`]). Null datapoints cannot be
/// compared and are dropped.
pub struct CullBelowValueMapping;

impl CullBelowValueMapping {
    fn find_pivot(datapoints: &TimeSeries, limit: Number) -> Result<Number> {
        let samples = datapoints
            .iter()
            .map(|(_, value)| value.and_then(|v| v.to_exact_f64()))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| {
                EngineError::unsupported(
                    "CULL_BELOW with percentile is only supported for values exactly representable as floating",
                )
            })?;
        percentile(&samples, limit.as_f64()).map(Number::Float)
    }
}

impl ValueMapping for CullBelowValueMapping {
    fn name(&self) -> &'static str {
        FunctionName::CullBelow.as_str()
    }

    fn mapping(&self, _datapoints: &TimeSeries) -> Result<TimeSeries> {
        Err(EngineError::unsupported("CULL_BELOW needs a limit and a type"))
    }

    fn mapping_with(&self, datapoints: &TimeSeries, constants: &[String]) -> Result<TimeSeries> {
        let function = self.name();
        require_constants(constants, 2, function)?;
        let limit = parse_constant(function, &constants[0])?;

        let pivot = match constants[1].as_str() {
            VALUE => limit,
            PERCENTILE if datapoints.is_empty() => return Ok(TimeSeries::new()),
            PERCENTILE => Self::find_pivot(datapoints, limit)?,
            other => {
                return Err(EngineError::invalid_argument(format!(
                    "CULL_BELOW type must be '{VALUE}' or '{PERCENTILE}', got '{other}'"
                )));
            }
        };

        Ok(datapoints
            .iter()
            .filter(|(_, value)| matches!(value, Some(v) if *v >= pivot))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants(limit: &str, mode: &str) -> Vec<String> {
        vec![limit.to_string(), mode.to_string()]
    }

    #[test]
    fn value_mode_keeps_points_at_or_above_limit() {
        let series: TimeSeries = [
            (1000, Number::Int(3)),
            (2000, Number::Int(5)),
            (3000, Number::Int(9)),
        ]
        .into_iter()
        .collect();

        let culled = CullBelowValueMapping
            .mapping_with(&series, &constants("5", VALUE))
            .unwrap();
        assert_eq!(culled.timestamps().collect::<Vec<_>>(), vec![2000, 3000]);

        let floats: TimeSeries = [
            (1000, Number::Float(4.99)),
            (2000, Number::Float(5.0)),
            (3000, Number::Float(5.01)),
        ]
        .into_iter()
        .collect();
        let culled = CullBelowValueMapping
            .mapping_with(&floats, &constants("5", VALUE))
            .unwrap();
        assert_eq!(culled.timestamps().collect::<Vec<_>>(), vec![2000, 3000]);
    }

    #[test]
    fn percentile_mode_uses_interpolated_pivot() {
        let series: TimeSeries = (1..=5)
            .map(|i| (i * 1000, Number::Float(i as f64)))
            .collect();

        // 50th percentile of 1..=5 is 3.0
        let culled = CullBelowValueMapping
            .mapping_with(&series, &constants("50", PERCENTILE))
            .unwrap();
        assert_eq!(culled.timestamps().collect::<Vec<_>>(), vec![3000, 4000, 5000]);
    }

    #[test]
    fn percentile_mode_rejects_nulls() {
        let mut series = TimeSeries::new();
        series.insert(1000, 1.0);
        series.insert_null(2000);
        let err = CullBelowValueMapping
            .mapping_with(&series, &constants("50", PERCENTILE))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedOperation(_)));
    }

    #[test]
    fn percentile_mode_rejects_out_of_range_limit() {
        let series: TimeSeries = [(1000, Number::Float(1.0))].into_iter().collect();
        assert!(matches!(
            CullBelowValueMapping.mapping_with(&series, &constants("150", PERCENTILE)),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn validates_arity_mode_and_limit() {
        let series = TimeSeries::new();
        assert!(matches!(
            CullBelowValueMapping.mapping(&series),
            Err(EngineError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            CullBelowValueMapping.mapping_with(&series, &["5".to_string()]),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            CullBelowValueMapping.mapping_with(&series, &constants("5", "median")),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            CullBelowValueMapping.mapping_with(&series, &constants("five", VALUE)),
            Err(EngineError::InvalidConstant { .. })
        ));
    }
}
