use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use vigil_common::error::{EngineError, Result};
use vigil_common::number::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    GreaterThan,
    GreaterThanOrEq,
    LessThan,
    LessThanOrEq,
    Equal,
    NotEqual,
    /// Inclusive on both ends.
    Between,
    NotBetween,
    /// Fires when there is no value at all.
    NoData,
}

impl TriggerType {
    pub const ALL: [TriggerType; 9] = [
        TriggerType::GreaterThan,
        TriggerType::GreaterThanOrEq,
        TriggerType::LessThan,
        TriggerType::LessThanOrEq,
        TriggerType::Equal,
        TriggerType::NotEqual,
        TriggerType::Between,
        TriggerType::NotBetween,
        TriggerType::NoData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEq => "GREATER_THAN_OR_EQ",
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEq => "LESS_THAN_OR_EQ",
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT_BETWEEN",
            Self::NoData => "NO_DATA",
        }
    }

    /// Whether the kind compares against a range and so needs a secondary
    /// threshold.
    pub fn requires_secondary(&self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }
}

impl FromStr for TriggerType {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownTriggerType(s.to_string()))
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A threshold condition owned by one alert.
///
/// Two triggers are the same trigger when they share a name and an owning
/// alert; thresholds and inertia do not take part in equality.
///
/// # Examples
///
/// ```
/// use vigil_alert::trigger::{Trigger, TriggerType};
/// use vigil_common::number::Number;
///
/// let trigger = Trigger::new(
///     "alert-1",
///     TriggerType::Between,
///     "cpu-band",
///     Number::Int(90),
///     Some(Number::Int(10)),
///     60_000,
/// )
/// .unwrap();
/// assert_eq!(trigger.bounds(), (Number::Int(10), Number::Int(90)));
/// assert_eq!(trigger.inertia().num_seconds(), 60);
///
/// assert!(Trigger::new("alert-1", TriggerType::Between, "cpu-band", Number::Int(90), None, 0).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub alert_id: String,
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    pub name: String,
    pub threshold: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_threshold: Option<Number>,
    /// How long the condition must hold before the trigger fires.
    #[serde(default)]
    pub inertia_millis: u64,
}

impl Trigger {
    pub fn new(
        alert_id: impl Into<String>,
        trigger_type: TriggerType,
        name: impl Into<String>,
        threshold: Number,
        secondary_threshold: Option<Number>,
        inertia_millis: u64,
    ) -> Result<Self> {
        let trigger = Self {
            alert_id: alert_id.into(),
            trigger_type,
            name: name.into(),
            threshold,
            secondary_threshold,
            inertia_millis,
        };
        trigger.validate()?;
        Ok(trigger)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid_argument("trigger name cannot be empty"));
        }
        if self.alert_id.trim().is_empty() {
            return Err(EngineError::invalid_argument(format!(
                "trigger {} must belong to an alert",
                self.name
            )));
        }
        if self.trigger_type.requires_secondary() && self.secondary_threshold.is_none() {
            return Err(EngineError::invalid_argument(format!(
                "{} trigger {} requires a secondary threshold",
                self.trigger_type, self.name
            )));
        }
        Ok(())
    }

    pub fn inertia(&self) -> Duration {
        i64::try_from(self.inertia_millis)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or(Duration::MAX)
    }

    /// `(low, high)` of the configured thresholds, in whichever order they
    /// were given. Without a secondary threshold both ends are the primary.
    pub fn bounds(&self) -> (Number, Number) {
        let secondary = self.secondary_threshold.unwrap_or(self.threshold);
        (self.threshold.min(secondary), self.threshold.max(secondary))
    }

    /// The uniqueness key: `(name, alert_id)`.
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.alert_id)
    }
}

impl PartialEq for Trigger {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Trigger {}

impl Hash for Trigger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.trigger_type.requires_secondary(), self.secondary_threshold) {
            (true, Some(secondary)) => write!(
                f,
                "Trigger{{type={}, name={}, primaryThreshold={}, secondaryThreshold={}, inertia={}}}",
                self.trigger_type, self.name, self.threshold, secondary, self.inertia_millis
            ),
            _ => write!(
                f,
                "Trigger{{type={}, name={}, threshold={}, inertia={}}}",
                self.trigger_type, self.name, self.threshold, self.inertia_millis
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn type_names_round_trip() {
        for kind in TriggerType::ALL {
            assert_eq!(kind.to_string().parse::<TriggerType>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        assert_eq!("greater_than_or_eq".parse::<TriggerType>().unwrap(), TriggerType::GreaterThanOrEq);
        assert!(matches!(
            "ABOVE".parse::<TriggerType>(),
            Err(EngineError::UnknownTriggerType(_))
        ));
    }

    #[test]
    fn equality_uses_name_and_alert() {
        let a = Trigger::new("alert-1", TriggerType::GreaterThan, "high", Number::Int(1), None, 0).unwrap();
        let b = Trigger::new("alert-1", TriggerType::LessThan, "high", Number::Float(5.0), None, 10).unwrap();
        let c = Trigger::new("alert-2", TriggerType::GreaterThan, "high", Number::Int(1), None, 0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: HashSet<Trigger> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn validation() {
        assert!(Trigger::new("alert-1", TriggerType::NoData, " ", Number::ZERO, None, 0).is_err());
        assert!(Trigger::new("", TriggerType::NoData, "silent", Number::ZERO, None, 0).is_err());
        assert!(Trigger::new("alert-1", TriggerType::NotBetween, "band", Number::ZERO, None, 0).is_err());
        assert!(Trigger::new("alert-1", TriggerType::Equal, "eq", Number::ZERO, None, 0).is_ok());
    }

    #[test]
    fn inertia_saturates() {
        let t = Trigger::new("a", TriggerType::NoData, "n", Number::ZERO, None, u64::MAX).unwrap();
        assert_eq!(t.inertia(), Duration::MAX);
        let t = Trigger::new("a", TriggerType::NoData, "n", Number::ZERO, None, 1500).unwrap();
        assert_eq!(t.inertia().num_milliseconds(), 1500);
    }

    #[test]
    fn display_matches_kind() {
        let band = Trigger::new(
            "a",
            TriggerType::Between,
            "band",
            Number::Int(1),
            Some(Number::Float(2.5)),
            100,
        )
        .unwrap();
        assert_eq!(
            band.to_string(),
            "Trigger{type=BETWEEN, name=band, primaryThreshold=1, secondaryThreshold=2.5, inertia=100}"
        );
        let high = Trigger::new("a", TriggerType::GreaterThan, "high", Number::Float(90.0), None, 0).unwrap();
        assert_eq!(
            high.to_string(),
            "Trigger{type=GREATER_THAN, name=high, threshold=90.0, inertia=0}"
        );
    }

    #[test]
    fn deserializes_from_json() {
        let trigger: Trigger = serde_json::from_str(
            r#"{"alert_id": "alert-9", "type": "NOT_BETWEEN", "name": "band",
                "threshold": 50, "secondary_threshold": 10.5, "inertia_millis": 30000}"#,
        )
        .unwrap();
        trigger.validate().unwrap();
        assert_eq!(trigger.trigger_type, TriggerType::NotBetween);
        assert!(trigger.threshold.is_integer());
        assert_eq!(trigger.bounds(), (Number::Float(10.5), Number::Int(50)));

        let broken: Trigger = serde_json::from_str(
            r#"{"alert_id": "alert-9", "type": "BETWEEN", "name": "band", "threshold": 50}"#,
        )
        .unwrap();
        assert!(broken.validate().is_err());
    }
}
