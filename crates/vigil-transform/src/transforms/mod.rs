//! Adapters lifting each capability shape to a whole-list [`crate::Transform`].

pub mod filter;
pub mod mapping;
pub mod reduce_or_mapping;
pub mod reducer;
pub mod zipper;

pub use filter::{FilterTransform, InternalReducer};
pub use mapping::MappingTransform;
pub use reduce_or_mapping::ReducerOrMappingTransform;
pub use reducer::ReducerTransform;
pub use zipper::{JoinPolicy, ZipperTransform, zip_series};

use vigil_common::types::{Metric, TimeSeries};

/// Name of every metric synthesised from several inputs.
pub const RESULT_METRIC_NAME: &str = "result";

/// A metric scoped to `scope`, carrying the tags every input shares.
pub(crate) fn result_metric(metrics: &[Metric], scope: &str, datapoints: TimeSeries) -> Metric {
    let mut tags = metrics
        .first()
        .map(|metric| metric.tags.clone())
        .unwrap_or_default();
    tags.retain(|key, value| {
        metrics
            .iter()
            .all(|metric| metric.tags.get(key) == Some(&*value))
    });
    Metric {
        scope: scope.to_string(),
        name: RESULT_METRIC_NAME.to_string(),
        tags,
        datapoints,
    }
}
