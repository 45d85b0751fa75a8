use crate::args::{parse_constant, require_metrics};
use crate::functions::average::AverageValueReducer;
use crate::percentile;
use crate::{Transform, ValueFilter, ValueReducer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::{Metric, TimeSeries};

/// How a filter collapses one metric into the scalar it compares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternalReducer {
    #[default]
    Average,
    Min,
    Max,
    Recent,
    Median,
}

impl InternalReducer {
    pub const ALL: [InternalReducer; 5] = [
        InternalReducer::Average,
        InternalReducer::Min,
        InternalReducer::Max,
        InternalReducer::Recent,
        InternalReducer::Median,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InternalReducer::Average => "average",
            InternalReducer::Min => "min",
            InternalReducer::Max => "max",
            InternalReducer::Recent => "recent",
            InternalReducer::Median => "median",
        }
    }

    /// `Ok(None)` when the series holds no non-null value.
    ///
    /// `average` divides by the number of datapoints, nulls included, the
    /// same way the `AVERAGE` reducer does.
    pub fn evaluate(&self, datapoints: &TimeSeries) -> Result<Option<Number>> {
        if datapoints.values().next().is_none() {
            return Ok(None);
        }
        let value = match self {
            InternalReducer::Average => {
                let slots: Vec<Option<Number>> = datapoints.iter().map(|(_, v)| v).collect();
                AverageValueReducer.reduce(&slots)?
            }
            InternalReducer::Min => datapoints.values().fold(Number::Float(f64::INFINITY), Number::min),
            InternalReducer::Max => datapoints
                .values()
                .fold(Number::Float(f64::NEG_INFINITY), Number::max),
            InternalReducer::Recent => match datapoints.values().last() {
                Some(value) => value,
                None => return Ok(None),
            },
            InternalReducer::Median => {
                let values: Vec<f64> = datapoints.values().map(|v| v.as_f64()).collect();
                Number::Float(percentile::median(&values)?)
            }
        };
        Ok(Some(value))
    }
}

impl fmt::Display for InternalReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InternalReducer {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|reducer| reducer.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::invalid_argument(format!("unknown internal reducer: {s}")))
    }
}

/// Reduces each metric to a scalar and keeps those a [`ValueFilter`] accepts.
///
/// Constants are `[limit]` or `[limit, reducer]`.
pub struct FilterTransform {
    filter: Box<dyn ValueFilter>,
    default_reducer: InternalReducer,
}

impl FilterTransform {
    pub fn new(filter: impl ValueFilter + 'static) -> Self {
        Self::with_reducer(filter, InternalReducer::default())
    }

    pub fn with_reducer(filter: impl ValueFilter + 'static, default_reducer: InternalReducer) -> Self {
        Self {
            filter: Box::new(filter),
            default_reducer,
        }
    }
}

impl Transform for FilterTransform {
    fn name(&self) -> &'static str {
        self.filter.name()
    }

    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        Err(EngineError::invalid_argument(format!(
            "{} requires a limit constant",
            self.name()
        )))
    }

    fn transform_with(&self, metrics: &[Metric], constants: &[String]) -> Result<Vec<Metric>> {
        let function = self.name();
        require_metrics(metrics, function)?;
        let (limit, reducer) = match constants {
            [limit] => (limit, self.default_reducer),
            [limit, reducer] => {
                let reducer = reducer
                    .parse::<InternalReducer>()
                    .map_err(|_| EngineError::invalid_constant(function, reducer.as_str()))?;
                (limit, reducer)
            }
            _ => {
                return Err(EngineError::invalid_argument(format!(
                    "{function} requires a limit and an optional reducer, got {} constant(s)",
                    constants.len()
                )));
            }
        };
        if limit.trim().is_empty() {
            return Err(EngineError::invalid_argument(format!(
                "{function} requires a non-empty limit"
            )));
        }
        parse_constant(function, limit)?;

        let mut evaluated = Vec::with_capacity(metrics.len());
        for metric in metrics {
            if let Some(value) = reducer.evaluate(&metric.datapoints)? {
                evaluated.push((metric.clone(), value.to_string()));
            }
        }
        if evaluated.is_empty() {
            return Ok(Vec::new());
        }
        self.filter.filter(&evaluated, limit)
    }
}
