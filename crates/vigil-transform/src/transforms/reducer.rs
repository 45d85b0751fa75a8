use super::result_metric;
use crate::args::require_metrics;
use crate::{Transform, ValueReducer};
use std::collections::BTreeMap;
use vigil_common::error::Result;
use vigil_common::number::Number;
use vigil_common::types::{Metric, TimeSeries};

/// Collapses all metrics into one by reducing the values found at each
/// timestamp.
pub struct ReducerTransform {
    reducer: Box<dyn ValueReducer>,
}

impl ReducerTransform {
    pub fn new(reducer: impl ValueReducer + 'static) -> Self {
        Self {
            reducer: Box::new(reducer),
        }
    }
}

impl Transform for ReducerTransform {
    fn name(&self) -> &'static str {
        self.reducer.name()
    }

    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        let reduced = reduce_by_timestamp(metrics, self.name(), |values| self.reducer.reduce(values))?;
        Ok(vec![reduced])
    }

    fn transform_with(&self, metrics: &[Metric], constants: &[String]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        let reduced = reduce_by_timestamp(metrics, self.name(), |values| {
            self.reducer.reduce_with(values, constants)
        })?;
        Ok(vec![reduced])
    }
}

/// Collates every metric's values by timestamp and reduces each slot list.
///
/// A timestamp is reduced over the metrics that have it, stored nulls
/// included. The reducer sees every slot list, even one holding only nulls.
pub(crate) fn reduce_by_timestamp<F>(metrics: &[Metric], scope: &str, reduce: F) -> Result<Metric>
where
    F: Fn(&[Option<Number>]) -> Result<Number>,
{
    let mut collated: BTreeMap<i64, Vec<Option<Number>>> = BTreeMap::new();
    for metric in metrics {
        for (ts, value) in metric.datapoints.iter() {
            collated.entry(ts).or_default().push(value);
        }
    }

    let mut datapoints = TimeSeries::new();
    for (ts, values) in collated {
        datapoints.insert(ts, reduce(&values)?);
    }
    Ok(result_metric(metrics, scope, datapoints))
}
