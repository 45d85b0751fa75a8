use crate::Transform;
use crate::config::TransformConfig;
use crate::functions::average::AverageValueReducer;
use crate::functions::average_below::AverageBelowTransform;
use crate::functions::below::BelowValueFilter;
use crate::functions::cull_below::CullBelowValueMapping;
use crate::functions::range::RangeTransform;
use crate::functions::scale::ScaleValueReducerOrMapping;
use crate::functions::zippers::{DiffValueZipper, ScaleValueZipper, SumValueZipper};
use crate::transforms::{
    FilterTransform, MappingTransform, ReducerOrMappingTransform, ReducerTransform,
    ZipperTransform,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use vigil_common::error::{EngineError, Result};

/// Every function a transform chain may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionName {
    #[serde(rename = "AVERAGE")]
    Average,
    #[serde(rename = "SCALE")]
    Scale,
    #[serde(rename = "SCALE_V")]
    ScaleV,
    #[serde(rename = "SUM_V")]
    SumV,
    #[serde(rename = "DIFF_V")]
    DiffV,
    #[serde(rename = "CULL_BELOW")]
    CullBelow,
    #[serde(rename = "BELOW")]
    Below,
    #[serde(rename = "AVERAGEBELOW")]
    AverageBelow,
    #[serde(rename = "RANGE")]
    Range,
}

impl FunctionName {
    pub const ALL: [FunctionName; 9] = [
        FunctionName::Average,
        FunctionName::Scale,
        FunctionName::ScaleV,
        FunctionName::SumV,
        FunctionName::DiffV,
        FunctionName::CullBelow,
        FunctionName::Below,
        FunctionName::AverageBelow,
        FunctionName::Range,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FunctionName::Average => "AVERAGE",
            FunctionName::Scale => "SCALE",
            FunctionName::ScaleV => "SCALE_V",
            FunctionName::SumV => "SUM_V",
            FunctionName::DiffV => "DIFF_V",
            FunctionName::CullBelow => "CULL_BELOW",
            FunctionName::Below => "BELOW",
            FunctionName::AverageBelow => "AVERAGEBELOW",
            FunctionName::Range => "RANGE",
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionName {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownFunction(s.to_string()))
    }
}

static GLOBAL: LazyLock<TransformRegistry> = LazyLock::new(TransformRegistry::new);

/// Maps each [`FunctionName`] to the transform that implements it.
///
/// A registry is immutable once built and safe to share across threads.
pub struct TransformRegistry {
    transforms: HashMap<FunctionName, Box<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::with_config(&TransformConfig::default())
    }

    pub fn with_config(config: &TransformConfig) -> Self {
        let policy = config.default_join_policy;
        let entries: [(FunctionName, Box<dyn Transform>); 9] = [
            (
                FunctionName::Average,
                Box::new(ReducerTransform::new(AverageValueReducer)),
            ),
            (
                FunctionName::Scale,
                Box::new(ReducerOrMappingTransform::new(ScaleValueReducerOrMapping)),
            ),
            (
                FunctionName::ScaleV,
                Box::new(ZipperTransform::with_policy(ScaleValueZipper, policy)),
            ),
            (
                FunctionName::SumV,
                Box::new(ZipperTransform::with_policy(SumValueZipper, policy)),
            ),
            (
                FunctionName::DiffV,
                Box::new(ZipperTransform::with_policy(DiffValueZipper, policy)),
            ),
            (
                FunctionName::CullBelow,
                Box::new(MappingTransform::new(CullBelowValueMapping)),
            ),
            (
                FunctionName::Below,
                Box::new(FilterTransform::with_reducer(
                    BelowValueFilter,
                    config.filter_reducer,
                )),
            ),
            (FunctionName::AverageBelow, Box::new(AverageBelowTransform)),
            (FunctionName::Range, Box::new(RangeTransform)),
        ];
        Self {
            transforms: entries.into_iter().collect(),
        }
    }

    /// The process-wide registry built from the default configuration.
    pub fn global() -> &'static TransformRegistry {
        &GLOBAL
    }

    pub fn get(&self, name: FunctionName) -> Option<&dyn Transform> {
        self.transforms.get(&name).map(|t| t.as_ref())
    }

    /// Resolves a function name as written in an expression.
    pub fn lookup(&self, name: &str) -> Result<&dyn Transform> {
        let function: FunctionName = name.parse()?;
        self.get(function)
            .ok_or_else(|| EngineError::UnknownFunction(name.to_string()))
    }

    /// Registered names in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = FunctionName> + '_ {
        FunctionName::ALL
            .into_iter()
            .filter(|name| self.transforms.contains_key(name))
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
