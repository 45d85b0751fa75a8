use super::reducer::reduce_by_timestamp;
use crate::args::require_metrics;
use crate::{Transform, ValueReducer, ValueReducerOrMapping};
use vigil_common::error::Result;
use vigil_common::types::Metric;

/// Reduces across metrics when called without constants; maps each metric
/// pointwise when called with them.
pub struct ReducerOrMappingTransform {
    function: Box<dyn ValueReducerOrMapping>,
}

impl ReducerOrMappingTransform {
    pub fn new(function: impl ValueReducerOrMapping + 'static) -> Self {
        Self {
            function: Box::new(function),
        }
    }
}

impl Transform for ReducerOrMappingTransform {
    fn name(&self) -> &'static str {
        ValueReducer::name(self.function.as_ref())
    }

    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        let reduced = reduce_by_timestamp(metrics, self.name(), |values| self.function.reduce(values))?;
        Ok(vec![reduced])
    }

    fn transform_with(&self, metrics: &[Metric], constants: &[String]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        metrics
            .iter()
            .map(|metric| {
                let datapoints = self.function.mapping_with(&metric.datapoints, constants)?;
                Ok(metric.derive(datapoints))
            })
            .collect()
    }
}
