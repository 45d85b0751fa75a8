use crate::trigger::{Trigger, TriggerType};
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;

/// Decides whether `trigger` fires for `actual`.
///
/// `None` means no value was computed. Only [`TriggerType::NoData`] can be
/// evaluated against it; every other kind rejects it. Range kinds compare
/// against [`Trigger::bounds`], so the order in which the two thresholds
/// were configured never matters.
pub fn evaluate_trigger(trigger: &Trigger, actual: Option<Number>) -> Result<bool> {
    let kind = trigger.trigger_type;
    let Some(actual) = actual else {
        return match kind {
            TriggerType::NoData => Ok(true),
            _ => Err(EngineError::invalid_argument(format!(
                "{kind} trigger {} cannot be evaluated without a value",
                trigger.name
            ))),
        };
    };
    if kind.requires_secondary() && trigger.secondary_threshold.is_none() {
        return Err(EngineError::invalid_argument(format!(
            "{kind} trigger {} has no secondary threshold",
            trigger.name
        )));
    }

    let threshold = trigger.threshold;
    let (low, high) = trigger.bounds();
    let fired = match kind {
        TriggerType::GreaterThan => actual > threshold,
        TriggerType::GreaterThanOrEq => actual >= threshold,
        TriggerType::LessThan => actual < threshold,
        TriggerType::LessThanOrEq => actual <= threshold,
        TriggerType::Equal => actual == threshold,
        TriggerType::NotEqual => actual != threshold,
        TriggerType::Between => actual >= low && actual <= high,
        TriggerType::NotBetween => actual < low || actual > high,
        TriggerType::NoData => false,
    };
    Ok(fired)
}

impl Trigger {
    /// See [`evaluate_trigger`].
    pub fn evaluate(&self, actual: Option<Number>) -> Result<bool> {
        evaluate_trigger(self, actual)
    }
}
