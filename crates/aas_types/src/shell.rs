//! Asset Administration Shell - the aggregate root for one asset

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Submodel;
use crate::timestamp::{self, monotonic_now};

// ─────────────────────────────────────────────────────────────────────────────
// Asset Status
// ─────────────────────────────────────────────────────────────────────────────

/// Operational status of an asset
///
/// Any status may follow any other; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[default]
    Active,
    Maintenance,
    Offline,
    Error,
}

impl AssetStatus {
    pub const ALL: [AssetStatus; 4] = [
        AssetStatus::Active,
        AssetStatus::Maintenance,
        AssetStatus::Offline,
        AssetStatus::Error,
    ];

    /// Canonical lowercase token ("active", "maintenance", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "active",
            AssetStatus::Maintenance => "maintenance",
            AssetStatus::Offline => "offline",
            AssetStatus::Error => "error",
        }
    }

    /// Title-case label for display
    pub fn label(&self) -> &'static str {
        match self {
            AssetStatus::Active => "Active",
            AssetStatus::Maintenance => "Maintenance",
            AssetStatus::Offline => "Offline",
            AssetStatus::Error => "Error",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status token outside the four known values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown asset status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for AssetStatus {
    type Err = ParseStatusError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        AssetStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Asset Shell
// ─────────────────────────────────────────────────────────────────────────────

/// Complete administration shell for one physical or logical asset
///
/// `created` is fixed at construction. `last_modified` starts equal to
/// `created` and only moves forward: attaching a submodel or changing the
/// status refreshes it, as does a persisted update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetShell {
    id: String,
    id_short: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    global_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: AssetStatus,
    #[serde(with = "timestamp")]
    created: DateTime<Utc>,
    #[serde(with = "timestamp")]
    last_modified: DateTime<Utc>,
    /// Optimistic concurrency token, advanced by the store on every update
    #[serde(default)]
    version: u64,
    #[serde(default)]
    submodels: BTreeMap<String, Submodel>,
}

impl AssetShell {
    /// Create a shell with status `Active` and no submodels
    pub fn new(id: impl Into<String>, id_short: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            id_short: id_short.into(),
            global_asset_id: None,
            description: None,
            status: AssetStatus::default(),
            created: now,
            last_modified: now,
            version: 0,
            submodels: BTreeMap::new(),
        }
    }

    pub fn with_global_asset_id(mut self, global_asset_id: impl Into<String>) -> Self {
        self.global_asset_id = Some(global_asset_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Initial status at construction time
    pub fn with_status(mut self, status: AssetStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder form of [`AssetShell::attach_submodel`]
    pub fn with_submodel(mut self, submodel: Submodel) -> Self {
        self.attach_submodel(submodel);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn id_short(&self) -> &str {
        &self.id_short
    }

    pub fn global_asset_id(&self) -> Option<&str> {
        self.global_asset_id.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Description if present, otherwise the short id
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.id_short)
    }

    pub fn status(&self) -> AssetStatus {
        self.status
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn submodels(&self) -> &BTreeMap<String, Submodel> {
        &self.submodels
    }

    pub fn submodel(&self, id_short: &str) -> Option<&Submodel> {
        self.submodels.get(id_short)
    }

    /// Mutable access to a submodel's elements; does not touch `last_modified`
    pub fn submodel_mut(&mut self, id_short: &str) -> Option<&mut Submodel> {
        self.submodels.get_mut(id_short)
    }

    /// Rename the display key. Uniqueness is enforced by the store on write.
    pub fn set_id_short(&mut self, id_short: impl Into<String>) {
        self.id_short = id_short.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Attach a submodel under its `id_short`.
    ///
    /// Last write wins: a submodel already attached under the same key is
    /// replaced and returned.
    pub fn attach_submodel(&mut self, submodel: Submodel) -> Option<Submodel> {
        let replaced = self
            .submodels
            .insert(submodel.id_short().to_string(), submodel);
        self.touch();
        replaced
    }

    pub fn set_status(&mut self, status: AssetStatus) {
        self.status = status;
        self.touch();
    }

    /// Refresh `last_modified` to the current time without ever moving it back
    pub fn touch(&mut self) {
        self.refresh_last_modified(self.last_modified);
    }

    /// Like [`AssetShell::touch`], but also never earlier than `floor`
    /// (e.g. the previously persisted `last_modified`).
    pub fn refresh_last_modified(&mut self, floor: DateTime<Utc>) {
        let floor = floor.max(self.last_modified).max(self.created);
        self.last_modified = monotonic_now(floor);
    }

    /// Advance the concurrency token; called by the store when it accepts a write
    pub fn advance_version(&mut self) {
        self.version += 1;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
