//! Alert Rules - threshold checks over element values
//!
//! Each rule watches one element of one submodel (by `id_short`) and fires
//! when the element's numeric reading meets its condition. A rule may carry
//! an escalation that raises the severity when a second, stricter condition
//! also holds. Rules are plain data so they can be loaded from configuration.

use aas_types::{AssetShell, ElementValue};
use serde::{Deserialize, Serialize};
use wildmatch::WildMatch;

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

/// Category of the monitored condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Maintenance,
    Performance,
    Temperature,
}

/// Alert trigger conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AlertCondition {
    /// Reading strictly above the limit
    HighLimit { value: f64 },
    /// Reading strictly below the limit
    LowLimit { value: f64 },
}

impl AlertCondition {
    /// Evaluate the condition against a numeric reading
    pub fn evaluate(&self, reading: f64) -> bool {
        match self {
            AlertCondition::HighLimit { value } => reading > *value,
            AlertCondition::LowLimit { value } => reading < *value,
        }
    }

    /// Get a description of the condition for messages
    pub fn description(&self) -> String {
        match self {
            AlertCondition::HighLimit { value } => format!("exceeds {}", value),
            AlertCondition::LowLimit { value } => format!("below {}", value),
        }
    }
}

/// Severity override applied when a stricter condition also holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub condition: AlertCondition,
    pub severity: AlertSeverity,
}

/// Configuration for an alert rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    /// Rule name, copied into every alert it raises
    pub name: String,
    pub kind: AlertKind,
    /// `id_short` of the submodel holding the watched element
    pub submodel: String,
    /// `id_short` of the watched element
    pub element: String,
    pub condition: AlertCondition,
    pub severity: AlertSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<Escalation>,
    /// Message template (can include {asset}, {value}, {threshold})
    pub message_template: String,
    /// Glob pattern matched against the shell's `id_short`
    #[serde(default = "default_pattern")]
    pub asset_pattern: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

/// A raised alert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// `id_short` of the shell
    pub asset: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub rule: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub value: ElementValue,
}

impl AlertRule {
    /// Check one shell; `None` when the rule is disabled, does not apply,
    /// or the element is missing or non-numeric.
    pub fn evaluate(&self, shell: &AssetShell) -> Option<Alert> {
        if !self.enabled || !WildMatch::new(&self.asset_pattern).matches(shell.id_short()) {
            return None;
        }

        let element = shell.submodel(&self.submodel)?.element(&self.element)?;
        let reading = element.value().numeric_reading()?;
        if !self.condition.evaluate(reading) {
            return None;
        }

        let severity = match &self.escalation {
            Some(escalation) if escalation.condition.evaluate(reading) => escalation.severity,
            _ => self.severity,
        };

        let message = self
            .message_template
            .replace("{asset}", shell.id_short())
            .replace("{value}", &element.value().to_string())
            .replace("{threshold}", &self.condition.description());

        Some(Alert {
            asset: shell.id_short().to_string(),
            kind: self.kind,
            rule: self.name.clone(),
            message,
            severity,
            value: element.value().clone(),
        })
    }
}

/// Built-in rule set: service hours, efficiency and motor temperature
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule {
            name: "service-hours".to_string(),
            kind: AlertKind::Maintenance,
            submodel: "Maintenance".to_string(),
            element: "ServiceHours".to_string(),
            condition: AlertCondition::HighLimit { value: 2000.0 },
            severity: AlertSeverity::Medium,
            escalation: Some(Escalation {
                condition: AlertCondition::HighLimit { value: 2500.0 },
                severity: AlertSeverity::High,
            }),
            message_template: "Service hours ({value}h) approaching maintenance limit"
                .to_string(),
            asset_pattern: default_pattern(),
            enabled: true,
        },
        AlertRule {
            name: "low-efficiency".to_string(),
            kind: AlertKind::Performance,
            submodel: "Operation".to_string(),
            element: "Efficiency".to_string(),
            condition: AlertCondition::LowLimit { value: 85.0 },
            severity: AlertSeverity::Medium,
            escalation: None,
            message_template: "Low efficiency: {value}%".to_string(),
            asset_pattern: default_pattern(),
            enabled: true,
        },
        AlertRule {
            name: "high-temperature".to_string(),
            kind: AlertKind::Temperature,
            submodel: "Operation".to_string(),
            element: "Temperature".to_string(),
            condition: AlertCondition::HighLimit { value: 60.0 },
            severity: AlertSeverity::High,
            escalation: None,
            message_template: "High temperature: {value}°C".to_string(),
            asset_pattern: default_pattern(),
            enabled: true,
        },
    ]
}

/// Ordered rule set applied to a fleet of shells
#[derive(Debug, Clone)]
pub struct AlertEngine {
    rules: Vec<AlertRule>,
}

impl AlertEngine {
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self { rules }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_rules())
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Evaluate every rule against every shell.
    ///
    /// Output follows shell order, then rule order, so a fixed input always
    /// yields the same list.
    pub fn scan(&self, shells: &[AssetShell]) -> Vec<Alert> {
        shells
            .iter()
            .flat_map(|shell| self.rules.iter().filter_map(move |rule| rule.evaluate(shell)))
            .collect()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
