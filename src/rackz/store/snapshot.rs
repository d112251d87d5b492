use super::{InventoryStore, Mutation};
use crate::error::{RackzError, Result};
use crate::model::Inventory;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Default snapshot file name.
pub const SNAPSHOT_FILENAME: &str = "inventory.json";

/// Renders the inventory as a pretty-printed (2-space) JSON array.
pub fn to_json(inventory: &Inventory) -> Result<String> {
    serde_json::to_string_pretty(inventory).map_err(RackzError::Serialization)
}

pub fn from_json(content: &str) -> Result<Inventory> {
    serde_json::from_str(content).map_err(RackzError::Serialization)
}

/// Reads a snapshot file strictly: missing or malformed files are errors.
pub fn read_snapshot(path: &Path) -> Result<Inventory> {
    let content = fs::read_to_string(path).map_err(RackzError::Io)?;
    from_json(&content)
}

/// Writes a snapshot file atomically (temp file in the same directory, then rename).
pub fn write_snapshot(path: &Path, inventory: &Inventory) -> Result<()> {
    let content = to_json(inventory)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(RackzError::Io)?;
    }

    let tmp_file = dir.join(format!(".inventory-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp_file, content).map_err(RackzError::Io)?;
    if let Err(e) = fs::rename(&tmp_file, path) {
        let _ = fs::remove_file(&tmp_file);
        return Err(RackzError::Io(e));
    }
    Ok(())
}

/// Sibling path an unreadable snapshot is moved to: `<name>.corrupt-<timestamp>`.
fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{}", Local::now().format("%Y%m%d-%H%M%S")));
    path.with_file_name(name)
}

/// Snapshot-file backend.
///
/// With `autosave` on, every mutation rewrites the file. With it off, changes
/// only live in memory until [`SnapshotStore::export`] is called.
///
/// An unreadable file is moved aside to a `.corrupt-<timestamp>` sibling
/// before the store starts fresh. If it cannot be moved, the store refuses to
/// write over it.
pub struct SnapshotStore {
    path: PathBuf,
    autosave: bool,
    dirty: bool,
    guarded: bool,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            autosave: true,
            dirty: false,
            guarded: false,
        }
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are mutations not yet written to the snapshot file.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the current inventory to the snapshot file.
    pub fn export(&mut self, inventory: &Inventory) -> Result<()> {
        if self.guarded {
            return Err(RackzError::Store(format!(
                "{} is unreadable and could not be backed up; move it aside before saving",
                self.path.display()
            )));
        }
        write_snapshot(&self.path, inventory)?;
        self.dirty = false;
        Ok(())
    }
}

impl InventoryStore for SnapshotStore {
    fn load(&mut self) -> Result<Inventory> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "Inventory file not found. Starting fresh.");
            return Ok(Inventory::default());
        }

        let loaded = fs::read_to_string(&self.path)
            .map_err(RackzError::Io)
            .and_then(|content| from_json(&content));

        match loaded {
            Ok(inventory) => {
                debug!(racks = inventory.racks.len(), "loaded snapshot");
                self.dirty = false;
                Ok(inventory)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Inventory file unreadable. Starting fresh.");
                let backup = corrupt_backup_path(&self.path);
                match fs::rename(&self.path, &backup) {
                    Ok(()) => {
                        warn!(backup = %backup.display(), "unreadable inventory moved aside");
                        self.guarded = false;
                    }
                    Err(e) => {
                        warn!(error = %e, "could not move unreadable inventory aside; saving disabled");
                        self.guarded = true;
                    }
                }
                Ok(Inventory::default())
            }
        }
    }

    fn persist(&mut self, mutation: &Mutation, inventory: &Inventory) -> Result<()> {
        debug!(?mutation, autosave = self.autosave, "snapshot persist");
        if self.autosave {
            self.export(inventory)
        } else {
            self.dirty = true;
            Ok(())
        }
    }

    fn describe(&self) -> String {
        format!("snapshot ({})", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FiledDocument, Rack};
    use crate::store::memory::fixtures::InventoryFixture;

    #[test]
    fn load_missing_file_yields_empty_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::new(dir.path().join(SNAPSHOT_FILENAME));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn load_corrupt_file_yields_empty_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        fs::write(&path, "{ not json").unwrap();

        let mut store = SnapshotStore::new(&path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_kept_aside_before_autosave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        let original = r#"[{"id":"SSS-RACK-1","boxes":[{"id":1,"files":[
            {"fileNumber":"F-1","fullName":"Ada"}]}]},]"#;
        fs::write(&path, original).unwrap();

        let mut store = SnapshotStore::new(&path);
        let mut inventory = store.load().unwrap();
        assert!(inventory.is_empty());

        inventory.racks.push(Rack::new("SSS-RACK-1"));
        store
            .persist(&Mutation::RackCreated(Rack::new("SSS-RACK-1")), &inventory)
            .unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), inventory);

        let backups: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("inventory.json.corrupt-"))
            })
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), original);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), "x").unwrap();

        let inventory = Inventory::new(vec![Rack::new("SSS-RACK-1")]);
        assert!(matches!(
            write_snapshot(&path, &inventory),
            Err(RackzError::Io(_))
        ));

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, [SNAPSHOT_FILENAME]);
    }

    #[test]
    fn read_snapshot_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[{\"boxes\": 3}]").unwrap();
        assert!(matches!(
            read_snapshot(&path),
            Err(RackzError::Serialization(_))
        ));
        assert!(matches!(
            read_snapshot(&dir.path().join("absent.json")),
            Err(RackzError::Io(_))
        ));
    }

    #[test]
    fn snapshot_round_trip_preserves_order_and_contents() {
        let inventory = InventoryFixture::new()
            .with_filled_rack(3, 2)
            .with_racks(1)
            .with_document(
                "SSS-RACK-9",
                4,
                FiledDocument::new("2023-12-31", "X-1", "Grace Hopper", "cobol"),
            )
            .build();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        write_snapshot(&path, &inventory).unwrap();

        let mut store = SnapshotStore::new(&path);
        let loaded = store.load().unwrap();
        assert_eq!(loaded, inventory);
        let ids: Vec<&str> = loaded.racks.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["SSS-RACK-1", "SSS-RACK-2", "SSS-RACK-9"]);
    }

    #[test]
    fn to_json_uses_two_space_indent_and_wire_names() {
        let mut inventory = InventoryFixture::new().with_filled_rack(1, 1).build();
        inventory.racks[0].boxes[0].files[0].label = "tax".into();

        let json = to_json(&inventory).unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\": \"SSS-RACK-1\""));
        assert!(json.contains("\"fileNumber\""));
        assert!(json.contains("\"fullName\""));
        assert!(json.contains("\"label\": \"tax\""));
    }

    #[test]
    fn autosave_writes_on_every_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SNAPSHOT_FILENAME);
        let mut store = SnapshotStore::new(&path);

        let inventory = Inventory::new(vec![Rack::new("SSS-RACK-1")]);
        store
            .persist(&Mutation::RackCreated(Rack::new("SSS-RACK-1")), &inventory)
            .unwrap();

        assert!(!store.is_dirty());
        assert_eq!(read_snapshot(&path).unwrap(), inventory);
    }

    #[test]
    fn manual_mode_defers_until_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        let mut store = SnapshotStore::new(&path).with_autosave(false);

        let inventory = Inventory::new(vec![Rack::new("SSS-RACK-1")]);
        store
            .persist(&Mutation::RackCreated(Rack::new("SSS-RACK-1")), &inventory)
            .unwrap();
        assert!(store.is_dirty());
        assert!(!path.exists());

        store.export(&inventory).unwrap();
        assert!(!store.is_dirty());
        assert_eq!(read_snapshot(&path).unwrap(), inventory);
    }
}
