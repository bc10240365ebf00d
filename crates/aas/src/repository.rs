//! Repository - durable storage of asset shells in a redb database
//!
//! Each shell is written as an indexed row projection plus its full payload,
//! both inside one write transaction. Reads that only need top-level fields
//! use the rows; full reconstruction always decodes the payload.
//!
//! Writers are serialized through a gate acquired with a bounded wait, and
//! [`Repository::update`] is compare-and-swap on the shell's version, so a
//! concurrent writer can never silently overwrite a newer revision.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use aas_types::AssetShell;
use parking_lot::{Mutex, MutexGuard};
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, Table, TableDefinition, WriteTransaction};
use tracing::{debug, info, warn};

use crate::codec::{self, ShellRecord, SubmodelRecord};
use crate::config::StoreConfig;
use crate::error::{Error, Result};

// Row projection per shell, keyed by shell id
const SHELL_ROWS: TableDefinition<&str, &[u8]> = TableDefinition::new("shell_rows");
// Full serialized shell, keyed by shell id
const SHELL_PAYLOADS: TableDefinition<&str, &[u8]> = TableDefinition::new("shell_payloads");
// Unique index: id_short -> shell id
const ID_SHORT_INDEX: TableDefinition<&str, &str> = TableDefinition::new("id_short_index");
// Denormalized submodel rows, keyed by submodel id
const SUBMODEL_ROWS: TableDefinition<&str, &[u8]> = TableDefinition::new("submodel_rows");

/// Durable store of asset shells
pub struct Repository {
    db: Database,
    write_gate: Mutex<()>,
    lock_timeout: Duration,
}

impl Repository {
    /// Open (or create) the database file named in the configuration
    pub fn open(config: &StoreConfig) -> Result<Self> {
        // Ensure parent directory exists
        let db_path = PathBuf::from(&config.db_path);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&db_path)?;
        let repo = Self::with_database(db, config.lock_timeout())?;

        info!(
            "Shell repository opened (db: {}, {} shells)",
            config.db_path,
            repo.count()?
        );
        Ok(repo)
    }

    /// Volatile store with the same semantics, for tests and tooling
    pub fn in_memory() -> Result<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_database(db, StoreConfig::default().lock_timeout())
    }

    /// Override the bounded wait applied to writes
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    fn with_database(db: Database, lock_timeout: Duration) -> Result<Self> {
        // Ensure tables exist so read transactions never see a missing table
        let write_txn = db.begin_write()?;
        write_txn.open_table(SHELL_ROWS)?;
        write_txn.open_table(SHELL_PAYLOADS)?;
        write_txn.open_table(ID_SHORT_INDEX)?;
        write_txn.open_table(SUBMODEL_ROWS)?;
        write_txn.commit()?;

        Ok(Self {
            db,
            write_gate: Mutex::new(()),
            lock_timeout,
        })
    }

    fn acquire_write(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_gate.try_lock_for(self.lock_timeout).ok_or_else(|| {
            Error::Timeout(format!(
                "store write not admitted within {} ms",
                self.lock_timeout.as_millis()
            ))
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist a new shell and its submodels.
    ///
    /// Fails with `DuplicateIdentity` if the `id`, the `id_short` or any
    /// submodel id is already taken; the store is left unchanged.
    pub fn create(&self, shell: &AssetShell) -> Result<()> {
        let payload = codec::encode_shell(shell)?;

        let _gate = self.acquire_write()?;
        let write_txn = self.db.begin_write()?;
        {
            let mut tables = WriteTables::open(&write_txn)?;
            if tables.record(shell.id())?.is_some() {
                return Err(Error::DuplicateIdentity(format!("id {}", shell.id())));
            }
            tables.put(shell, &payload, None)?;
        }
        write_txn.commit()?;

        debug!(
            "Created shell {} ({}, {} submodels)",
            shell.id(),
            shell.id_short(),
            shell.submodels().len()
        );
        Ok(())
    }

    /// Overwrite a stored shell.
    ///
    /// The shell's version must equal the stored one, otherwise
    /// `VersionConflict`. On success the store refreshes `last_modified`,
    /// advances the version, and `shell` is replaced with the persisted value.
    /// On failure neither the store nor `shell` changes.
    pub fn update(&self, shell: &mut AssetShell) -> Result<()> {
        codec::validate_shell(shell)?;

        let _gate = self.acquire_write()?;
        let write_txn = self.db.begin_write()?;
        let next = {
            let mut tables = WriteTables::open(&write_txn)?;
            let previous = tables
                .record(shell.id())?
                .ok_or_else(|| Error::NotFound(shell.id().to_string()))?;

            if previous.version != shell.version() {
                warn!(
                    "Rejected stale update of {} (version {}, stored {})",
                    shell.id(),
                    shell.version(),
                    previous.version
                );
                return Err(Error::VersionConflict {
                    id: shell.id().to_string(),
                    expected: shell.version(),
                    stored: previous.version,
                });
            }
            if previous.created != shell.created() {
                return Err(Error::MalformedRecord(format!(
                    "created timestamp of {} cannot change",
                    shell.id()
                )));
            }

            let next = next_revision(shell.clone(), &previous);
            let payload = codec::encode_shell(&next)?;
            tables.put(&next, &payload, Some(&previous))?;
            next
        };
        write_txn.commit()?;

        debug!("Updated shell {} to version {}", next.id(), next.version());
        *shell = next;
        Ok(())
    }

    /// Read-modify-write of the shell `id` inside one write transaction
    pub fn modify<F>(&self, id: &str, f: F) -> Result<AssetShell>
    where
        F: FnOnce(&mut AssetShell),
    {
        self.modify_with(|_| Ok(id.to_string()), f)
    }

    /// Read-modify-write of the shell whose `id_short` matches
    pub fn modify_by_id_short<F>(&self, id_short: &str, f: F) -> Result<AssetShell>
    where
        F: FnOnce(&mut AssetShell),
    {
        self.modify_with(
            |tables| {
                tables
                    .resolve_id_short(id_short)?
                    .ok_or_else(|| Error::NotFound(id_short.to_string()))
            },
            f,
        )
    }

    fn modify_with<R, F>(&self, resolve: R, f: F) -> Result<AssetShell>
    where
        R: FnOnce(&WriteTables<'_>) -> Result<String>,
        F: FnOnce(&mut AssetShell),
    {
        let _gate = self.acquire_write()?;
        let write_txn = self.db.begin_write()?;
        let next = {
            let mut tables = WriteTables::open(&write_txn)?;
            let id = resolve(&tables)?;
            let previous = tables
                .record(&id)?
                .ok_or_else(|| Error::NotFound(id.clone()))?;
            let mut shell = tables.shell(&id)?.ok_or_else(|| {
                Error::MalformedRecord(format!("row {} has no payload", id))
            })?;

            f(&mut shell);
            if shell.id() != id {
                return Err(Error::MalformedRecord(format!("shell id {} cannot change", id)));
            }

            let next = next_revision(shell, &previous);
            let payload = codec::encode_shell(&next)?;
            tables.put(&next, &payload, Some(&previous))?;
            next
        };
        write_txn.commit()?;

        debug!("Modified shell {} to version {}", next.id(), next.version());
        Ok(next)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Fully reconstructed shell, or `None` if no shell has this id
    pub fn get(&self, id: &str) -> Result<Option<AssetShell>> {
        let read_txn = self.db.begin_read()?;
        let payloads = read_txn.open_table(SHELL_PAYLOADS)?;
        match payloads.get(id)? {
            Some(payload) => Ok(Some(codec::decode_shell(payload.value())?)),
            None => Ok(None),
        }
    }

    /// Fully reconstructed shell looked up through the `id_short` index
    pub fn get_by_id_short(&self, id_short: &str) -> Result<Option<AssetShell>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ID_SHORT_INDEX)?;
        let id = match index.get(id_short)? {
            Some(id) => id.value().to_string(),
            None => return Ok(None),
        };

        let payloads = read_txn.open_table(SHELL_PAYLOADS)?;
        match payloads.get(id.as_str())? {
            Some(payload) => Ok(Some(codec::decode_shell(payload.value())?)),
            None => Err(Error::MalformedRecord(format!(
                "index entry {} points at missing shell {}",
                id_short, id
            ))),
        }
    }

    /// Top-level fields only; the payload is not decoded
    pub fn get_record(&self, id: &str) -> Result<Option<ShellRecord>> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(SHELL_ROWS)?;
        match rows.get(id)? {
            Some(row) => Ok(Some(codec::decode_record(row.value())?)),
            None => Ok(None),
        }
    }

    /// Every row projection, in id order
    pub fn list_records(&self) -> Result<Vec<ShellRecord>> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(SHELL_ROWS)?;

        let mut records = Vec::new();
        for entry in rows.iter()? {
            let (_, row) = entry?;
            records.push(codec::decode_record(row.value())?);
        }
        Ok(records)
    }

    /// Every shell, fully reconstructed, in id order.
    ///
    /// One undecodable payload fails the whole call; partial lists are never
    /// returned.
    pub fn list_all(&self) -> Result<Vec<AssetShell>> {
        let read_txn = self.db.begin_read()?;
        let payloads = read_txn.open_table(SHELL_PAYLOADS)?;

        let mut shells = Vec::new();
        for entry in payloads.iter()? {
            let (_, payload) = entry?;
            shells.push(codec::decode_shell(payload.value())?);
        }
        Ok(shells)
    }

    /// Submodel row by submodel id
    pub fn get_submodel_record(&self, id: &str) -> Result<Option<SubmodelRecord>> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(SUBMODEL_ROWS)?;
        match rows.get(id)? {
            Some(row) => Ok(Some(codec::decode_record(row.value())?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(SHELL_ROWS)?;

        let mut count = 0;
        for entry in rows.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }
}

/// The stored successor of `shell`: refreshed timestamp, next version
fn next_revision(mut shell: AssetShell, previous: &ShellRecord) -> AssetShell {
    shell.refresh_last_modified(previous.last_modified);
    shell.advance_version();
    shell
}

// ─────────────────────────────────────────────────────────────────────────────
// Write Transaction Tables
// ─────────────────────────────────────────────────────────────────────────────

/// All tables opened for one write transaction
struct WriteTables<'txn> {
    rows: Table<'txn, &'static str, &'static [u8]>,
    payloads: Table<'txn, &'static str, &'static [u8]>,
    id_shorts: Table<'txn, &'static str, &'static str>,
    submodels: Table<'txn, &'static str, &'static [u8]>,
}

impl<'txn> WriteTables<'txn> {
    fn open(write_txn: &'txn WriteTransaction) -> Result<Self> {
        Ok(Self {
            rows: write_txn.open_table(SHELL_ROWS)?,
            payloads: write_txn.open_table(SHELL_PAYLOADS)?,
            id_shorts: write_txn.open_table(ID_SHORT_INDEX)?,
            submodels: write_txn.open_table(SUBMODEL_ROWS)?,
        })
    }

    fn record(&self, id: &str) -> Result<Option<ShellRecord>> {
        match self.rows.get(id)? {
            Some(row) => Ok(Some(codec::decode_record(row.value())?)),
            None => Ok(None),
        }
    }

    fn shell(&self, id: &str) -> Result<Option<AssetShell>> {
        match self.payloads.get(id)? {
            Some(payload) => Ok(Some(codec::decode_shell(payload.value())?)),
            None => Ok(None),
        }
    }

    fn resolve_id_short(&self, id_short: &str) -> Result<Option<String>> {
        Ok(self.id_shorts.get(id_short)?.map(|id| id.value().to_string()))
    }

    /// Write rows, payload and index entries for `shell`, replacing the
    /// entries of `previous` (the stored revision) when given.
    fn put(
        &mut self,
        shell: &AssetShell,
        payload: &[u8],
        previous: Option<&ShellRecord>,
    ) -> Result<()> {
        let id = shell.id();

        if let Some(owner) = self.resolve_id_short(shell.id_short())? {
            if owner != id {
                return Err(Error::DuplicateIdentity(format!(
                    "id_short {} (owned by {})",
                    shell.id_short(),
                    owner
                )));
            }
        }

        let mut seen = HashSet::new();
        for submodel in shell.submodels().values() {
            if !seen.insert(submodel.id()) {
                return Err(Error::DuplicateIdentity(format!(
                    "submodel id {} used twice in {}",
                    submodel.id(),
                    id
                )));
            }
            let existing = self.submodels.get(submodel.id())?.map(|row| row.value().to_vec());
            if let Some(bytes) = existing {
                let row: SubmodelRecord = codec::decode_record(&bytes)?;
                if row.aas_id != id {
                    return Err(Error::DuplicateIdentity(format!(
                        "submodel id {} (owned by {})",
                        submodel.id(),
                        row.aas_id
                    )));
                }
            }
        }

        if let Some(previous) = previous {
            if previous.id_short != shell.id_short() {
                self.id_shorts.remove(previous.id_short.as_str())?;
            }
            for submodel_id in &previous.submodel_ids {
                self.submodels.remove(submodel_id.as_str())?;
            }
        }

        let record = ShellRecord::from_shell(shell);
        self.rows.insert(id, codec::encode_record(&record)?.as_slice())?;
        self.payloads.insert(id, payload)?;
        self.id_shorts.insert(shell.id_short(), id)?;
        for submodel in shell.submodels().values() {
            let row = SubmodelRecord::new(id, submodel);
            self.submodels
                .insert(submodel.id(), codec::encode_record(&row)?.as_slice())?;
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use aas_types::{AssetStatus, Element, ElementValue, Submodel};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn robot() -> AssetShell {
        AssetShell::new("urn:aas:robot:R47", "Robot_R47")
            .with_description("Industrial Welding Robot KUKA KR-150")
            .with_submodel(
                Submodel::new("urn:submodel:maintenance:R47", "Maintenance")
                    .with_element(Element::new("ServiceHours", 2100)),
            )
            .with_submodel(
                Submodel::new("urn:submodel:operation:R47", "Operation")
                    .with_element(Element::new("Efficiency", 94.5)),
            )
    }

    fn conveyor() -> AssetShell {
        AssetShell::new("urn:aas:conveyor:L01", "Conveyor_L01")
            .with_status(AssetStatus::Maintenance)
            .with_submodel(
                Submodel::new("urn:submodel:operation:L01", "Operation")
                    .with_element(Element::new("Speed", 0.0)),
            )
    }

    #[test]
    fn test_create_and_get_roundtrip() {
        let repo = Repository::in_memory().unwrap();
        let shell = robot();
        repo.create(&shell).unwrap();

        assert_eq!(repo.get(shell.id()).unwrap(), Some(shell.clone()));
        assert_eq!(repo.get_by_id_short("Robot_R47").unwrap(), Some(shell.clone()));
        assert_eq!(repo.get("urn:aas:missing").unwrap(), None);
        assert_eq!(repo.count().unwrap(), 1);

        let record = repo.get_record(shell.id()).unwrap().unwrap();
        assert_eq!(record, ShellRecord::from_shell(&shell));

        let sm = repo
            .get_submodel_record("urn:submodel:operation:R47")
            .unwrap()
            .unwrap();
        assert_eq!(sm.aas_id, shell.id());
        assert_eq!(&sm.payload, shell.submodel("Operation").unwrap());
    }

    #[test]
    fn test_duplicate_identity_leaves_store_unchanged() {
        let repo = Repository::in_memory().unwrap();
        repo.create(&robot()).unwrap();
        let before = repo.list_all().unwrap();

        let same_id = AssetShell::new("urn:aas:robot:R47", "Other");
        assert!(matches!(repo.create(&same_id), Err(Error::DuplicateIdentity(_))));

        let same_short = AssetShell::new("urn:aas:robot:R48", "Robot_R47");
        assert!(matches!(repo.create(&same_short), Err(Error::DuplicateIdentity(_))));

        let stolen_submodel = AssetShell::new("urn:aas:robot:R49", "Robot_R49")
            .with_submodel(Submodel::new("urn:submodel:operation:R47", "Operation"));
        assert!(matches!(repo.create(&stolen_submodel), Err(Error::DuplicateIdentity(_))));

        assert_eq!(repo.list_all().unwrap(), before);
        assert_eq!(repo.get_by_id_short("Other").unwrap(), None);
        assert_eq!(repo.get("urn:aas:robot:R49").unwrap(), None);
    }

    #[test]
    fn test_list_all_returns_every_shell() {
        let repo = Repository::in_memory().unwrap();
        assert!(repo.list_all().unwrap().is_empty());

        repo.create(&robot()).unwrap();
        repo.create(&conveyor()).unwrap();

        let mut ids: Vec<String> = repo
            .list_all()
            .unwrap()
            .iter()
            .map(|s| s.id_short().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["Conveyor_L01", "Robot_R47"]);
        assert_eq!(repo.list_records().unwrap().len(), 2);
    }

    #[test]
    fn test_update_refreshes_and_versions() {
        let repo = Repository::in_memory().unwrap();
        let mut shell = robot();
        repo.create(&shell).unwrap();
        let created = shell.created();
        let before = shell.last_modified();

        shell.set_status(AssetStatus::Offline);
        repo.update(&mut shell).unwrap();

        assert_eq!(shell.version(), 1);
        assert_eq!(shell.created(), created);
        assert!(shell.last_modified() >= before);

        let stored = repo.get(shell.id()).unwrap().unwrap();
        assert_eq!(stored, shell);
        assert_eq!(stored.status(), AssetStatus::Offline);
        assert_eq!(repo.get_record(shell.id()).unwrap().unwrap().version, 1);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo = Repository::in_memory().unwrap();
        let mut shell = robot();
        assert!(matches!(repo.update(&mut shell), Err(Error::NotFound(_))));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_stale_update_conflicts() {
        let repo = Repository::in_memory().unwrap();
        let shell = robot();
        repo.create(&shell).unwrap();

        let mut first = shell.clone();
        let mut second = shell.clone();

        first.set_status(AssetStatus::Maintenance);
        repo.update(&mut first).unwrap();

        second.set_status(AssetStatus::Error);
        let snapshot = second.clone();
        let err = repo.update(&mut second).unwrap_err();
        assert!(matches!(err, Error::VersionConflict { expected: 0, stored: 1, .. }));
        assert_eq!(second, snapshot);

        let stored = repo.get(shell.id()).unwrap().unwrap();
        assert_eq!(stored.status(), AssetStatus::Maintenance);
    }

    #[test]
    fn test_update_rejects_recreated_shell() {
        let repo = Repository::in_memory().unwrap();
        let original = robot();
        repo.create(&original).unwrap();

        // Same id and version, but a different creation instant
        let mut value: serde_json::Value =
            serde_json::from_slice(&codec::encode_shell(&original).unwrap()).unwrap();
        value["created"] = serde_json::json!("2020-01-01T00:00:00.000000000Z");
        let mut replacement: AssetShell = serde_json::from_value(value).unwrap();
        assert_ne!(replacement.created(), original.created());
        assert_eq!(replacement.version(), original.version());

        assert!(matches!(
            repo.update(&mut replacement),
            Err(Error::MalformedRecord(_))
        ));
        assert_eq!(repo.get(original.id()).unwrap(), Some(original));
    }

    #[test]
    fn test_create_rejects_last_modified_before_created() {
        let repo = Repository::in_memory().unwrap();

        let mut value: serde_json::Value =
            serde_json::from_slice(&codec::encode_shell(&robot()).unwrap()).unwrap();
        value["created"] = serde_json::json!("2025-01-01T00:00:00.000000000Z");
        value["last_modified"] = serde_json::json!("2024-01-01T00:00:00.000000000Z");
        let backdated: AssetShell = serde_json::from_value(value).unwrap();

        assert!(matches!(repo.create(&backdated), Err(Error::MalformedRecord(_))));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_update_renames_and_replaces_submodels() {
        let repo = Repository::in_memory().unwrap();
        repo.create(&conveyor()).unwrap();
        let mut shell = robot();
        repo.create(&shell).unwrap();

        shell.set_id_short("Robot_R47b");
        shell.attach_submodel(Submodel::new("urn:submodel:operation:R47v2", "Operation"));
        repo.update(&mut shell).unwrap();

        assert_eq!(repo.get_by_id_short("Robot_R47").unwrap(), None);
        assert_eq!(repo.get_by_id_short("Robot_R47b").unwrap(), Some(shell.clone()));
        assert_eq!(repo.get_submodel_record("urn:submodel:operation:R47").unwrap(), None);
        assert!(repo
            .get_submodel_record("urn:submodel:operation:R47v2")
            .unwrap()
            .is_some());

        // The old id_short is free again
        repo.create(&AssetShell::new("urn:aas:robot:new", "Robot_R47")).unwrap();

        // Renaming onto another shell's id_short is rejected
        let mut clash = repo.get(shell.id()).unwrap().unwrap();
        clash.set_id_short("Conveyor_L01");
        assert!(matches!(repo.update(&mut clash), Err(Error::DuplicateIdentity(_))));
        assert_eq!(repo.get(shell.id()).unwrap(), Some(shell));
    }

    #[test]
    fn test_modify_by_id_short() {
        let repo = Repository::in_memory().unwrap();
        let shell = robot();
        repo.create(&shell).unwrap();

        let modified = repo
            .modify_by_id_short("Robot_R47", |s| {
                if let Some(op) = s.submodel_mut("Operation") {
                    op.set_element_value("Efficiency", 80.0);
                }
            })
            .unwrap();

        assert_eq!(modified.version(), 1);
        assert!(modified.last_modified() >= shell.last_modified());
        let stored = repo.get(shell.id()).unwrap().unwrap();
        assert_eq!(
            stored.submodel("Operation").unwrap().element("Efficiency").unwrap().value(),
            &ElementValue::Float(80.0)
        );

        let err = repo.modify_by_id_short("Nobody", |_| {}).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = repo.modify("urn:aas:nobody", |_| {}).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_concurrent_modifications_serialize() {
        let repo = Arc::new(Repository::in_memory().unwrap());
        let shell = robot();
        repo.create(&shell).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    let status = AssetStatus::ALL[i % AssetStatus::ALL.len()];
                    repo.modify_by_id_short("Robot_R47", |s| s.set_status(status))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = repo.get(shell.id()).unwrap().unwrap();
        assert_eq!(stored.version(), 8);
        assert!(stored.last_modified() >= stored.created());
    }

    #[test]
    fn test_write_times_out_when_gate_held() {
        let repo = Repository::in_memory()
            .unwrap()
            .with_lock_timeout(Duration::from_millis(20));

        let _held = repo.write_gate.lock();
        assert!(matches!(repo.create(&robot()), Err(Error::Timeout(_))));
    }

    #[test]
    fn test_durable_across_reopen() {
        let dir = tempdir().unwrap();
        let config = StoreConfig {
            db_path: dir
                .path()
                .join("nested/aas.redb")
                .to_string_lossy()
                .to_string(),
            ..StoreConfig::default()
        };

        let mut shell = robot();
        {
            let repo = Repository::open(&config).unwrap();
            repo.create(&shell).unwrap();
            shell.set_status(AssetStatus::Offline);
            repo.update(&mut shell).unwrap();
        }

        let repo = Repository::open(&config).unwrap();
        assert_eq!(repo.get(shell.id()).unwrap(), Some(shell));
        assert_eq!(repo.count().unwrap(), 1);
    }
}
