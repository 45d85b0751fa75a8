use crate::transforms::{InternalReducer, JoinPolicy};
use serde::{Deserialize, Serialize};

/// Defaults the registry applies when a chain step leaves them unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Join policy of `SCALE_V`, `SUM_V` and `DIFF_V` when no policy
    /// constant is given.
    #[serde(default = "default_join_policy")]
    pub default_join_policy: JoinPolicy,
    /// How `BELOW` reduces a metric to a scalar when no reducer constant
    /// is given.
    #[serde(default = "default_filter_reducer")]
    pub filter_reducer: InternalReducer,
}

fn default_join_policy() -> JoinPolicy {
    JoinPolicy::Intersection
}

fn default_filter_reducer() -> InternalReducer {
    InternalReducer::Average
}

impl TransformConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: TransformConfig = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            default_join_policy: default_join_policy(),
            filter_reducer: default_filter_reducer(),
        }
    }
}
