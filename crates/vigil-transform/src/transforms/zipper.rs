use crate::args::require_metrics;
use crate::{Transform, ValueZipper};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use vigil_common::error::{EngineError, Result};
use vigil_common::types::{Metric, TimeSeries};

/// Which timestamps survive when two series are aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Only timestamps present in both series.
    #[default]
    Intersection,
    /// Every timestamp present in either series.
    Union,
}

impl JoinPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinPolicy::Intersection => "INTERSECTION",
            JoinPolicy::Union => "UNION",
        }
    }
}

impl fmt::Display for JoinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INTERSECTION" => Ok(JoinPolicy::Intersection),
            "UNION" => Ok(JoinPolicy::Union),
            _ => Err(EngineError::invalid_argument(format!(
                "unknown join policy: {s}"
            ))),
        }
    }
}

/// Aligns `data` with `vector` and combines them pointwise.
///
/// A side that lacks the timestamp, or stores a null there, contributes the
/// zipper's identity element, so under [`JoinPolicy::Union`] a point present
/// on one side only passes through as `zip(value, identity)` or
/// `zip(identity, vector)`.
///
/// # Examples
///
/// ```
/// use vigil_common::number::Number;
/// use vigil_common::types::TimeSeries;
/// use vigil_transform::functions::zippers::ScaleValueZipper;
/// use vigil_transform::transforms::{JoinPolicy, zip_series};
///
/// let data: TimeSeries = [(1000, Number::Float(2.0)), (2000, Number::Float(3.0))]
///     .into_iter()
///     .collect();
/// let vector: TimeSeries = [(1000, Number::Int(10))].into_iter().collect();
///
/// let joined = zip_series(&ScaleValueZipper, &data, &vector, JoinPolicy::Intersection);
/// assert_eq!(joined.len(), 1);
/// assert_eq!(joined.get(1000), Some(Some(Number::Float(20.0))));
///
/// let joined = zip_series(&ScaleValueZipper, &data, &vector, JoinPolicy::Union);
/// assert_eq!(joined.get(2000), Some(Some(Number::Float(3.0))));
/// ```
pub fn zip_series(
    zipper: &dyn ValueZipper,
    data: &TimeSeries,
    vector: &TimeSeries,
    policy: JoinPolicy,
) -> TimeSeries {
    let timestamps: BTreeSet<i64> = match policy {
        JoinPolicy::Intersection => data
            .timestamps()
            .filter(|ts| vector.contains(*ts))
            .collect(),
        JoinPolicy::Union => data.timestamps().chain(vector.timestamps()).collect(),
    };

    let identity = zipper.identity();
    timestamps
        .into_iter()
        .map(|ts| {
            let value = data.get(ts).flatten().unwrap_or(identity);
            let operand = vector.get(ts).flatten().unwrap_or(identity);
            (ts, zipper.zip(value, operand))
        })
        .collect()
}

/// Zips every metric but the last against the last one (the vector).
///
/// Takes no constants or exactly one join policy name.
pub struct ZipperTransform {
    zipper: Box<dyn ValueZipper>,
    default_policy: JoinPolicy,
}

impl ZipperTransform {
    pub fn new(zipper: impl ValueZipper + 'static) -> Self {
        Self::with_policy(zipper, JoinPolicy::default())
    }

    pub fn with_policy(zipper: impl ValueZipper + 'static, default_policy: JoinPolicy) -> Self {
        Self {
            zipper: Box::new(zipper),
            default_policy,
        }
    }

    fn zip_all(&self, metrics: &[Metric], policy: JoinPolicy) -> Result<Vec<Metric>> {
        let function = self.name();
        let Some((vector, data)) = metrics.split_last().filter(|(_, data)| !data.is_empty()) else {
            return Err(EngineError::invalid_argument(format!(
                "{function} needs at least one data metric and a vector metric"
            )));
        };
        if let Some(empty) = metrics.iter().find(|m| m.datapoints.is_empty()) {
            return Err(EngineError::invalid_argument(format!(
                "{function} cannot zip {} because it has no datapoints",
                empty.identity()
            )));
        }

        Ok(data
            .iter()
            .map(|metric| {
                metric.derive(zip_series(
                    self.zipper.as_ref(),
                    &metric.datapoints,
                    &vector.datapoints,
                    policy,
                ))
            })
            .collect())
    }
}

impl Transform for ZipperTransform {
    fn name(&self) -> &'static str {
        self.zipper.name()
    }

    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>> {
        self.zip_all(metrics, self.default_policy)
    }

    fn transform_with(&self, metrics: &[Metric], constants: &[String]) -> Result<Vec<Metric>> {
        require_metrics(metrics, self.name())?;
        let policy = match constants {
            [] => self.default_policy,
            [policy] => policy
                .parse::<JoinPolicy>()
                .map_err(|_| EngineError::invalid_constant(self.name(), policy.as_str()))?,
            _ => {
                return Err(EngineError::invalid_argument(format!(
                    "{} accepts at most one join policy, got {} constants",
                    self.name(),
                    constants.len()
                )));
            }
        };
        self.zip_all(metrics, policy)
    }
}
