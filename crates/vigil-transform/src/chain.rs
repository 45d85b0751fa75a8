use crate::registry::{FunctionName, TransformRegistry};
use serde::{Deserialize, Serialize};
use vigil_common::error::Result;
use vigil_common::types::Metric;

/// One function invocation within a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStep {
    pub function: FunctionName,
    #[serde(default)]
    pub constants: Vec<String>,
}

impl TransformStep {
    pub fn new(function: FunctionName) -> Self {
        Self {
            function,
            constants: Vec::new(),
        }
    }

    pub fn with_constants<I, S>(function: FunctionName, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function,
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }
}

/// An ordered list of steps, each fed the previous step's output.
///
/// # Examples
///
/// ```
/// use vigil_common::types::{Metric, TimeSeries};
/// use vigil_common::number::Number;
/// use vigil_transform::chain::{TransformChain, TransformStep};
/// use vigil_transform::registry::{FunctionName, TransformRegistry};
///
/// let series: TimeSeries = [(1000, Number::Int(2)), (2000, Number::Int(8))]
///     .into_iter()
///     .collect();
/// let metrics = vec![Metric::new("system", "load").with_datapoints(series)];
///
/// let chain = TransformChain::new()
///     .then(TransformStep::with_constants(FunctionName::Scale, ["10"]))
///     .then(TransformStep::with_constants(FunctionName::CullBelow, ["50", "value"]));
///
/// let out = chain.apply(TransformRegistry::global(), &metrics).unwrap();
/// assert_eq!(out[0].datapoints.len(), 1);
/// assert_eq!(out[0].datapoints.get(2000), Some(Some(Number::Int(80))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformChain {
    steps: Vec<TransformStep>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: TransformStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order. The first failing step aborts the chain.
    ///
    /// An empty chain returns the input unchanged.
    pub fn apply(&self, registry: &TransformRegistry, metrics: &[Metric]) -> Result<Vec<Metric>> {
        let mut current = metrics.to_vec();
        for (index, step) in self.steps.iter().enumerate() {
            let function = step.function.as_str();
            let transform = registry.lookup(function)?;
            let result = if step.constants.is_empty() {
                transform.transform(&current)
            } else {
                transform.transform_with(&current, &step.constants)
            };
            match result {
                Ok(output) => {
                    tracing::debug!(
                        step = index,
                        function,
                        input = current.len(),
                        output = output.len(),
                        "Transform stage applied"
                    );
                    current = output;
                }
                Err(e) => {
                    tracing::warn!(step = index, function, error = %e, "Transform stage failed");
                    return Err(e);
                }
            }
        }
        Ok(current)
    }
}

impl FromIterator<TransformStep> for TransformChain {
    fn from_iter<I: IntoIterator<Item = TransformStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
