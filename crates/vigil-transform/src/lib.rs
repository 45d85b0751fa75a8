//! Metric transform engine.
//!
//! A transform chain is an ordered list of named functions, each applied to
//! the list of metrics the previous one produced. Functions come in a few
//! capability shapes: pointwise [`ValueMapping`]s, cross-series
//! [`ValueReducer`]s, [`ValueFilter`]s that select metrics by a scalar, and
//! [`ValueZipper`]s that combine aligned series. Each shape is lifted to a
//! whole-list [`Transform`] by an adapter in [`transforms`], and the
//! [`registry::TransformRegistry`] maps function names to those transforms.
//!
//! Everything here is stateless: the same input and constants always give
//! the same output, and caller-supplied metrics are never modified.

mod args;
pub mod chain;
pub mod config;
pub mod functions;
pub mod percentile;
pub mod registry;
pub mod transforms;


use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::{Metric, TimeSeries};

/// A whole-list operation: the unit each chain stage invokes.
pub trait Transform: Send + Sync {
    /// Function name, also the scope of any metric this transform synthesises.
    fn name(&self) -> &'static str;

    /// Applies the transform with no constants.
    fn transform(&self, metrics: &[Metric]) -> Result<Vec<Metric>>;

    /// Applies the transform with positional string constants.
    fn transform_with(&self, metrics: &[Metric], constants: &[String]) -> Result<Vec<Metric>>;
}

/// A pure per-series transform.
pub trait ValueMapping: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fails with [`EngineError::UnsupportedOperation`] if the function
    /// needs configuration.
    fn mapping(&self, datapoints: &TimeSeries) -> Result<TimeSeries>;

    fn mapping_with(&self, datapoints: &TimeSeries, constants: &[String]) -> Result<TimeSeries>;
}

/// Combines the values found at one timestamp across several series.
///
/// `values` holds one slot per series that has the timestamp; a `None` slot
/// is a stored null.
pub trait ValueReducer: Send + Sync {
    fn name(&self) -> &'static str;

    fn reduce(&self, values: &[Option<Number>]) -> Result<Number>;

    fn reduce_with(&self, _values: &[Option<Number>], _constants: &[String]) -> Result<Number> {
        Err(EngineError::unsupported(format!(
            "{} reducer does not accept constants",
            self.name()
        )))
    }
}

/// Selects the metrics whose pre-computed scalar satisfies a comparison
/// against `limit`.
pub trait ValueFilter: Send + Sync {
    fn name(&self) -> &'static str;

    /// `evaluated` pairs each metric with its scalar rendered as a string.
    fn filter(&self, evaluated: &[(Metric, String)], limit: &str) -> Result<Vec<Metric>>;
}

/// A function that reduces across series when given several, and maps
/// pointwise when given constants.
pub trait ValueReducerOrMapping: ValueReducer + ValueMapping {}

/// A pointwise binary operator applied to two aligned series.
pub trait ValueZipper: Send + Sync {
    fn name(&self) -> &'static str;

    /// Stands in for a missing or null operand.
    fn identity(&self) -> Number;

    fn zip(&self, value: Number, vector: Number) -> Number;
}
