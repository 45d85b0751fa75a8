use crate::ValueFilter;
use crate::args::parse_constant;
use crate::registry::FunctionName;
use vigil_common::error::{EngineError, Result};
use vigil_common::types::Metric;

/// Keeps the metrics whose evaluated value is strictly below the limit.
pub struct BelowValueFilter;

impl ValueFilter for BelowValueFilter {
    fn name(&self) -> &'static str {
        FunctionName::Below.as_str()
    }

    fn filter(&self, evaluated: &[(Metric, String)], limit: &str) -> Result<Vec<Metric>> {
        if evaluated.is_empty() {
            return Err(EngineError::invalid_argument(
                "BELOW needs at least one evaluated metric",
            ));
        }
        if limit.trim().is_empty() {
            return Err(EngineError::invalid_argument("BELOW limit must be provided"));
        }

        let function = self.name();
        let limit = parse_constant(function, limit)?;
        let mut result = Vec::new();
        for (metric, value) in evaluated {
            if limit > parse_constant(function, value)? {
                result.push(metric.clone());
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluated(values: &[&str]) -> Vec<(Metric, String)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (Metric::new("scope", format!("m{i}")), v.to_string()))
            .collect()
    }

    #[test]
    fn keeps_values_strictly_below() {
        let kept = BelowValueFilter
            .filter(&evaluated(&["1", "2.0", "2", "3.5"]), "2")
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "m0");

        let kept = BelowValueFilter
            .filter(&evaluated(&["1", "2.0", "3.5"]), "2.5")
            .unwrap();
        assert_eq!(
            kept.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            vec!["m0", "m1"]
        );
    }

    #[test]
    fn rejects_missing_input() {
        assert!(matches!(
            BelowValueFilter.filter(&[], "2"),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            BelowValueFilter.filter(&evaluated(&["1"]), ""),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            BelowValueFilter.filter(&evaluated(&["1"]), "low"),
            Err(EngineError::InvalidConstant { .. })
        ));
        assert!(matches!(
            BelowValueFilter.filter(&evaluated(&["n/a"]), "2"),
            Err(EngineError::InvalidConstant { .. })
        ));
    }
}
