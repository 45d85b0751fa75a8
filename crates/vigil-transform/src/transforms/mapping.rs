use crate::args::require_metrics;
use crate::{Transform, ValueMapping};
use vigil_common::error::Result;
use vigil_common::types::Metric;

/// Applies a [`ValueMapping`] to every metric independently.
pub struct MappingTransform {
    mapping: Box<dyn ValueMapping>,
}

impl MappingTransform {
    pub fn new(mapping: impl ValueMapping + 'static) -> Self {
        Self {
            mapping: Box::new(mapping),
        }
    }
}

impl Transform for MappingTransform {
    fn name(&self) -> &'static str {
        self.mapping.name()
    }

    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        metrics
            .iter()
            .map(|metric| Ok(metric.derive(self.mapping.mapping(&metric.datapoints)?)))
            .collect()
    }

    fn transform_with(&self, metrics: &[Metric], constants: &[String]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        metrics
            .iter()
            .map(|metric| {
                let datapoints = self.mapping.mapping_with(&metric.datapoints, constants)?;
                Ok(metric.derive(datapoints))
            })
            .collect()
    }
}
