use crate::evaluator::evaluate_trigger;
use crate::trigger::{Trigger, TriggerType};
use chrono::{DateTime, Duration, Utc};
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;
use vigil_common::types::Metric;
use vigil_transform::chain::TransformChain;
use vigil_transform::registry::TransformRegistry;

/// The outcome of one trigger against one computed metric.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvaluation {
    pub trigger: String,
    pub alert: String,
    /// Identity of the evaluated metric; `None` when the chain produced no
    /// metric at all.
    pub metric: Option<String>,
    /// Latest value of the metric, if it had one.
    pub value: Option<Number>,
    pub threshold: Number,
    pub fired: bool,
    /// How long the caller must see `fired` persist before notifying.
    pub inertia: Duration,
    pub evaluated_at: DateTime<Utc>,
}

/// Runs one evaluation cycle: applies a transform chain, then checks every
/// trigger against what the chain produced.
///
/// The engine keeps no state between cycles. Inertia is reported on each
/// [`TriggerEvaluation`] for the scheduler to track.
pub struct AlertEngine<'r> {
    registry: &'r TransformRegistry,
    triggers: Vec<Trigger>,
}

impl AlertEngine<'static> {
    /// An engine backed by [`TransformRegistry::global`].
    pub fn new() -> Self {
        Self::with_registry(TransformRegistry::global())
    }
}

impl Default for AlertEngine<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> AlertEngine<'r> {
    pub fn with_registry(registry: &'r TransformRegistry) -> Self {
        Self {
            registry,
            triggers: Vec::new(),
        }
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Get a trigger by its name and owning alert.
    pub fn get_trigger(&self, name: &str, alert_id: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.key() == (name, alert_id))
    }

    /// Add a trigger. Fails if it is invalid or its `(name, alert)` is taken.
    pub fn add_trigger(&mut self, trigger: Trigger) -> Result<()> {
        trigger.validate()?;
        if self.triggers.contains(&trigger) {
            return Err(EngineError::invalid_argument(format!(
                "trigger {} already exists for alert {}",
                trigger.name, trigger.alert_id
            )));
        }
        self.triggers.push(trigger);
        Ok(())
    }

    /// Remove a trigger. Returns true if found and removed.
    pub fn remove_trigger(&mut self, name: &str, alert_id: &str) -> bool {
        let len_before = self.triggers.len();
        self.triggers.retain(|t| t.key() != (name, alert_id));
        self.triggers.len() < len_before
    }

    /// Replace all triggers with a new set. On error the current set is kept.
    pub fn replace_triggers(&mut self, triggers: Vec<Trigger>) -> Result<()> {
        let mut replacement = AlertEngine::with_registry(self.registry);
        for trigger in triggers {
            replacement.add_trigger(trigger)?;
        }
        self.triggers = replacement.triggers;
        Ok(())
    }

    /// Applies `chain` to `metrics` and evaluates every trigger against the
    /// latest datapoint of every resulting metric.
    ///
    /// A metric without a latest value only fires `NO_DATA` triggers. When
    /// the chain leaves no metric, each `NO_DATA` trigger is evaluated once
    /// with no metric and fires.
    pub fn evaluate(
        &self,
        chain: &TransformChain,
        metrics: &[Metric],
        now: DateTime<Utc>,
    ) -> Result<Vec<TriggerEvaluation>> {
        let computed = chain.apply(self.registry, metrics)?;

        if computed.is_empty() {
            let mut evaluations = Vec::new();
            for trigger in self
                .triggers
                .iter()
                .filter(|t| t.trigger_type == TriggerType::NoData)
            {
                evaluations.push(self.decide(trigger, None, None, now)?);
            }
            return Ok(evaluations);
        }

        let mut evaluations = Vec::with_capacity(computed.len() * self.triggers.len());
        for metric in &computed {
            let value = metric.datapoints.latest().and_then(|(_, value)| value);
            let identity = metric.identity();
            for trigger in &self.triggers {
                evaluations.push(self.decide(trigger, Some(identity.as_str()), value, now)?);
            }
        }
        Ok(evaluations)
    }

    fn decide(
        &self,
        trigger: &Trigger,
        metric: Option<&str>,
        value: Option<Number>,
        now: DateTime<Utc>,
    ) -> Result<TriggerEvaluation> {
        let fired = match value {
            None if trigger.trigger_type != TriggerType::NoData => false,
            _ => evaluate_trigger(trigger, value)?,
        };

        tracing::debug!(
            trigger = %trigger.name,
            alert = %trigger.alert_id,
            kind = %trigger.trigger_type,
            metric = metric.unwrap_or("-"),
            value = ?value,
            fired,
            "Trigger evaluated"
        );

        Ok(TriggerEvaluation {
            trigger: trigger.name.clone(),
            alert: trigger.alert_id.clone(),
            metric: metric.map(str::to_string),
            value,
            threshold: trigger.threshold,
            fired,
            inertia: trigger.inertia(),
            evaluated_at: now,
        })
    }
}
