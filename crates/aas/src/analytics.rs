//! Analytics - derived views over the whole fleet
//!
//! Every view reads the full shell set from the repository on each call; there
//! is no cache. The projections themselves are plain functions over a slice of
//! shells so they can be reused on any snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use aas_types::{AssetShell, AssetStatus, ElementValue};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::alerts::{Alert, AlertEngine};
use crate::error::Result;
use crate::repository::Repository;

/// Marker rendered for values that are not available
pub const NOT_AVAILABLE: &str = "N/A";

pub const MAINTENANCE_SUBMODEL: &str = "Maintenance";
pub const OPERATION_SUBMODEL: &str = "Operation";

// ─────────────────────────────────────────────────────────────────────────────
// View Types
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the fleet overview table
///
/// `None` means the source submodel or element is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub id: String,
    pub name: String,
    pub status: String,
    pub last_maintenance: Option<String>,
    pub next_service: Option<String>,
    pub efficiency: Option<ElementValue>,
}

impl AssetSummary {
    /// Display cells, with [`NOT_AVAILABLE`] for missing values
    pub fn cells(&self) -> [String; 6] {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        [
            self.id.clone(),
            self.name.clone(),
            self.status.clone(),
            or_na(&self.last_maintenance),
            or_na(&self.next_service),
            self.efficiency
                .as_ref()
                .map(|e| format!("{}%", e))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ]
    }
}

/// Per-element metadata in a detail view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementDetail {
    pub value: ElementValue,
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Full nested projection of one shell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDetail {
    pub asset_id: String,
    pub id_short: String,
    pub name: String,
    pub status: AssetStatus,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// submodel id_short -> element id_short -> element
    pub submodels: BTreeMap<String, BTreeMap<String, ElementDetail>>,
}

/// Fleet-wide counts and averages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetMetrics {
    pub total_assets: usize,
    pub active_assets: usize,
    pub maintenance_assets: usize,
    pub offline_assets: usize,
    pub error_assets: usize,
    /// Mean Operation/Efficiency, one decimal; 0 when no shell reports one
    pub average_efficiency: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Projections
// ─────────────────────────────────────────────────────────────────────────────

fn element_value<'a>(shell: &'a AssetShell, submodel: &str, element: &str) -> Option<&'a ElementValue> {
    shell
        .submodel(submodel)
        .and_then(|sm| sm.element(element))
        .map(|e| e.value())
}

/// Date portion of a date-like value: its first 10 characters
fn date_portion(value: &ElementValue) -> String {
    value.to_string().chars().take(10).collect()
}

/// One decimal, ties to even (87.25 -> 87.2)
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

pub fn summarize_shells(shells: &[AssetShell]) -> Vec<AssetSummary> {
    shells
        .iter()
        .map(|shell| AssetSummary {
            id: shell.id_short().to_string(),
            name: shell.display_name().to_string(),
            status: shell.status().label().to_string(),
            last_maintenance: element_value(shell, MAINTENANCE_SUBMODEL, "LastService")
                .map(date_portion),
            next_service: element_value(shell, MAINTENANCE_SUBMODEL, "NextService")
                .map(date_portion),
            efficiency: element_value(shell, OPERATION_SUBMODEL, "Efficiency").cloned(),
        })
        .collect()
}

/// Match by exact `id_short`, or by a trailing fragment of the full `id`.
/// An empty identity matches nothing.
pub fn find_shell<'a>(shells: &'a [AssetShell], identity: &str) -> Option<&'a AssetShell> {
    if identity.is_empty() {
        return None;
    }
    shells
        .iter()
        .find(|shell| shell.id_short() == identity || shell.id().ends_with(identity))
}

pub fn detail_of(shell: &AssetShell) -> AssetDetail {
    let submodels = shell
        .submodels()
        .iter()
        .map(|(name, submodel)| {
            let elements = submodel
                .elements()
                .iter()
                .map(|(element_name, element)| {
                    let detail = ElementDetail {
                        value: element.value().clone(),
                        value_type: element.value_type().to_string(),
                        description: element.description().map(str::to_string),
                        last_updated: element.last_updated(),
                    };
                    (element_name.clone(), detail)
                })
                .collect();
            (name.clone(), elements)
        })
        .collect();

    AssetDetail {
        asset_id: shell.id().to_string(),
        id_short: shell.id_short().to_string(),
        name: shell.display_name().to_string(),
        status: shell.status(),
        created: shell.created(),
        last_modified: shell.last_modified(),
        submodels,
    }
}

pub fn metrics_of(shells: &[AssetShell]) -> FleetMetrics {
    let count = |status: AssetStatus| shells.iter().filter(|s| s.status() == status).count();

    let efficiencies: Vec<f64> = shells
        .iter()
        .filter_map(|shell| element_value(shell, OPERATION_SUBMODEL, "Efficiency"))
        .filter_map(ElementValue::numeric_reading)
        .collect();
    let average_efficiency = if efficiencies.is_empty() {
        0.0
    } else {
        round_one_decimal(efficiencies.iter().sum::<f64>() / efficiencies.len() as f64)
    };

    FleetMetrics {
        total_assets: shells.len(),
        active_assets: count(AssetStatus::Active),
        maintenance_assets: count(AssetStatus::Maintenance),
        offline_assets: count(AssetStatus::Offline),
        error_assets: count(AssetStatus::Error),
        average_efficiency,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fleet Analytics Service
// ─────────────────────────────────────────────────────────────────────────────

/// Read-side views over a repository, plus the status update entry point
pub struct FleetAnalytics {
    repo: Arc<Repository>,
    alerts: AlertEngine,
}

impl FleetAnalytics {
    pub fn new(repo: Arc<Repository>, alerts: AlertEngine) -> Self {
        Self { repo, alerts }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn summarize(&self) -> Result<Vec<AssetSummary>> {
        Ok(summarize_shells(&self.repo.list_all()?))
    }

    /// `None` when no shell matches `identity`
    pub fn detail(&self, identity: &str) -> Result<Option<AssetDetail>> {
        let shells = self.repo.list_all()?;
        Ok(find_shell(&shells, identity).map(detail_of))
    }

    pub fn fleet_metrics(&self) -> Result<FleetMetrics> {
        Ok(metrics_of(&self.repo.list_all()?))
    }

    pub fn alerts(&self) -> Result<Vec<Alert>> {
        let alerts = self.alerts.scan(&self.repo.list_all()?);
        for alert in &alerts {
            debug!(
                "Alert raised: {} on {} ({:?})",
                alert.rule, alert.asset, alert.severity
            );
        }
        Ok(alerts)
    }

    /// Set the status of the shell with this `id_short`.
    ///
    /// The token is validated (case-insensitive) before storage is touched;
    /// an unknown token fails with `InvalidStatus`.
    pub fn update_status(&self, id_short: &str, token: &str) -> Result<AssetShell> {
        let status: AssetStatus = token.parse()?;
        let shell = self
            .repo
            .modify_by_id_short(id_short, |shell| shell.set_status(status))?;

        info!("Status of {} set to {}", id_short, status);
        Ok(shell)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
