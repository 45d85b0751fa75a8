use crate::number::Number;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse mapping from a millisecond timestamp to an optional value.
///
/// A timestamp that is absent from the series and a timestamp stored with
/// `None` are different things: collectors write explicit `None` entries
/// for buckets they polled but got no reading for, and the zipper treats
/// those differently from a gap.
///
/// # Examples
///
/// ```
/// use vigil_common::number::Number;
/// use vigil_common::types::TimeSeries;
///
/// let mut series = TimeSeries::new();
/// series.insert(1000, 1);
/// series.insert_null(2000);
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.get(2000), Some(None));
/// assert_eq!(series.get(3000), None);
/// assert_eq!(series.values().collect::<Vec<_>>(), vec![Number::Int(1)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries(BTreeMap<i64, Option<Number>>);

impl TimeSeries {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, timestamp: i64, value: impl Into<Number>) {
        self.0.insert(timestamp, Some(value.into()));
    }

    /// Stores an explicit "no value" marker at `timestamp`.
    pub fn insert_null(&mut self, timestamp: i64) {
        self.0.insert(timestamp, None);
    }

    pub fn insert_entry(&mut self, timestamp: i64, value: Option<Number>) {
        self.0.insert(timestamp, value);
    }

    /// `None` if the timestamp is absent, `Some(None)` if it holds a null.
    pub fn get(&self, timestamp: i64) -> Option<Option<Number>> {
        self.0.get(&timestamp).copied()
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.0.contains_key(&timestamp)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending timestamp order, nulls included.
    pub fn iter(&self) -> impl Iterator<Item = (i64, Option<Number>)> + '_ {
        self.0.iter().map(|(ts, value)| (*ts, *value))
    }

    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.keys().copied()
    }

    /// Non-null values in ascending timestamp order.
    pub fn values(&self) -> impl Iterator<Item = Number> + '_ {
        self.0.values().filter_map(|value| *value)
    }

    /// The entry with the greatest timestamp.
    pub fn latest(&self) -> Option<(i64, Option<Number>)> {
        self.0.last_key_value().map(|(ts, value)| (*ts, *value))
    }
}

impl FromIterator<(i64, Number)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (i64, Number)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(ts, value)| (ts, Some(value))).collect())
    }
}

impl FromIterator<(i64, Option<Number>)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (i64, Option<Number>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A scoped, named time series plus identity tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub scope: String,
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub datapoints: TimeSeries,
}

impl Metric {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            tags: BTreeMap::new(),
            datapoints: TimeSeries::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_datapoints(mut self, datapoints: TimeSeries) -> Self {
        self.datapoints = datapoints;
        self
    }

    /// A copy of this metric's identity carrying a new series.
    pub fn derive(&self, datapoints: TimeSeries) -> Metric {
        Metric {
            scope: self.scope.clone(),
            name: self.name.clone(),
            tags: self.tags.clone(),
            datapoints,
        }
    }

    /// `scope:name` followed by the tags in braces, if any.
    pub fn identity(&self) -> String {
        let tags = format_tags(&self.tags);
        if tags.is_empty() {
            format!("{}:{}", self.scope, self.name)
        } else {
            format!("{}:{}{{{}}}", self.scope, self.name, tags)
        }
    }
}

/// Format a tag map into a human-readable string.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use vigil_common::types::format_tags;
///
/// let mut tags = BTreeMap::new();
/// tags.insert("host".to_string(), "web-01".to_string());
/// tags.insert("dc".to_string(), "east".to_string());
/// assert_eq!(format_tags(&tags), "dc=east, host=web-01");
/// ```
pub fn format_tags(tags: &BTreeMap<String, String>) -> String {
    tags.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_are_distinct() {
        let series: TimeSeries = [(1000, Some(Number::Int(1))), (2000, None)]
            .into_iter()
            .collect();
        assert_eq!(series.get(1000), Some(Some(Number::Int(1))));
        assert_eq!(series.get(2000), Some(None));
        assert_eq!(series.get(3000), None);
        assert!(series.contains(2000));
        assert_eq!(series.values().count(), 1);
    }

    #[test]
    fn latest_is_greatest_timestamp() {
        let mut series = TimeSeries::new();
        series.insert(3000, 3);
        series.insert(1000, 1);
        series.insert_null(2000);
        assert_eq!(series.latest(), Some((3000, Some(Number::Int(3)))));
        assert_eq!(series.timestamps().collect::<Vec<_>>(), vec![1000, 2000, 3000]);
    }

    #[test]
    fn identity_includes_sorted_tags() {
        let metric = Metric::new("system.web", "cpu.usage")
            .with_tag("host", "web-01")
            .with_tag("dc", "east");
        assert_eq!(metric.identity(), "system.web:cpu.usage{dc=east, host=web-01}");
        assert_eq!(Metric::new("s", "m").identity(), "s:m");
    }

    #[test]
    fn derive_keeps_identity() {
        let metric = Metric::new("s", "m").with_tag("k", "v");
        let derived = metric.derive([(1000, Number::Float(1.0))].into_iter().collect());
        assert_eq!(derived.identity(), metric.identity());
        assert_eq!(derived.datapoints.len(), 1);
        assert!(metric.datapoints.is_empty());
    }

    #[test]
    fn metric_json_round_trip_keeps_nulls() {
        let mut series = TimeSeries::new();
        series.insert(1000, 1.5);
        series.insert_null(2000);
        let metric = Metric::new("s", "m").with_datapoints(series);
        let json = serde_json::to_string(&metric).unwrap();
        let back: Metric = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metric);
        assert_eq!(back.datapoints.get(2000), Some(None));
    }
}
