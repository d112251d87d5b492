//! # Remote Sync Adapter
//!
//! Mirrors inventory mutations into a path-addressed realtime database and
//! takes the database's answer as the truth.
//!
//! ## Path Layout
//!
//! ```text
//! inventory/
//! ├── SSS-RACK-1/
//! │   ├── boxes       # full box array (same shape as the snapshot)
//! │   └── createdAt   # epoch millis, set once at rack creation
//! └── SSS-RACK-2/ ...
//! ```
//!
//! Box and document mutations overwrite the rack's whole `boxes` array, so
//! the last writer wins per rack. There is no conflict resolution.
//!
//! ## Subscription
//!
//! On first load the store subscribes to `inventory`. Every notification is
//! decoded and parked as the pending update; the API picks it up through
//! [`InventoryStore::take_update`] and replaces its local inventory.
//!
//! Write failures are logged and swallowed: the local view stays as it is
//! until the next notification overwrites it.

use super::{InventoryStore, Mutation};
use crate::error::{RackzError, Result};
use crate::model::{FileBox, Inventory, Rack};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, warn};

pub mod memory_db;
pub mod rest;

pub use memory_db::MemoryDatabase;
pub use rest::RestDatabase;

/// Root path holding one child per rack.
pub const ROOT_PATH: &str = "inventory";

/// Callback receiving the value at a subscribed path.
pub type Listener = Box<dyn FnMut(&Value)>;

/// Minimal client surface of a path-addressed realtime database.
///
/// Paths are `/`-separated keys relative to the database root.
pub trait RemoteDatabase {
    /// Read the value at `path` (`Value::Null` when absent).
    fn get(&self, path: &str) -> Result<Value>;

    /// Overwrite the value at `path`.
    fn set(&self, path: &str, value: &Value) -> Result<()>;

    /// Delete the value at `path`.
    fn remove(&self, path: &str) -> Result<()>;

    /// Register a standing listener on `path`. The listener fires once with
    /// the current value and again after every write touching `path`.
    fn subscribe(&self, path: &str, listener: Listener) -> Result<()>;

    /// Pull changes made by other clients into the listeners. Push-based
    /// databases deliver them on their own and need not implement this.
    fn poll(&self) -> Result<()> {
        Ok(())
    }
}

/// One rack entry as stored remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RemoteRack {
    #[serde(default)]
    boxes: Vec<FileBox>,
    #[serde(rename = "createdAt", default)]
    created_at: i64,
}

pub(crate) fn rack_path(rack_id: &str) -> String {
    format!("{}/{}", ROOT_PATH, rack_id)
}

pub(crate) fn boxes_path(rack_id: &str) -> String {
    format!("{}/{}/boxes", ROOT_PATH, rack_id)
}

/// Splits a database path into its non-empty segments.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Whether a write at `a` is visible to a listener at `b` (or vice versa).
pub(crate) fn paths_overlap(a: &str, b: &str) -> bool {
    let a = segments(a);
    let b = segments(b);
    a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Decodes the value stored at [`ROOT_PATH`] into an inventory.
///
/// Racks come back ordered by creation time, then by numeric suffix.
pub fn decode_root(value: &Value) -> Result<Inventory> {
    let entries: Option<BTreeMap<String, RemoteRack>> =
        serde_json::from_value(value.clone()).map_err(RackzError::Serialization)?;

    let mut racks: Vec<(i64, Rack)> = entries
        .unwrap_or_default()
        .into_iter()
        .map(|(id, remote)| {
            (
                remote.created_at,
                Rack {
                    id,
                    boxes: remote.boxes,
                },
            )
        })
        .collect();

    racks.sort_by(|(ta, a), (tb, b)| {
        ta.cmp(tb)
            .then_with(|| a.number().cmp(&b.number()))
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(Inventory::new(racks.into_iter().map(|(_, r)| r).collect()))
}

/// Encodes a whole inventory for [`ROOT_PATH`], stamping creation times that
/// preserve the current rack order.
pub fn encode_root(inventory: &Inventory) -> Result<Value> {
    let base = Utc::now().timestamp_millis();
    let mut map = serde_json::Map::new();
    for (i, rack) in inventory.racks.iter().enumerate() {
        let entry = RemoteRack {
            boxes: rack.boxes.clone(),
            created_at: base + i as i64,
        };
        map.insert(
            rack.id.clone(),
            serde_json::to_value(entry).map_err(RackzError::Serialization)?,
        );
    }
    Ok(Value::Object(map))
}

/// Remote-database backend.
pub struct RemoteStore<D: RemoteDatabase> {
    db: D,
    pending: Rc<RefCell<Option<Inventory>>>,
    subscribed: bool,
}

impl<D: RemoteDatabase> RemoteStore<D> {
    pub fn new(db: D) -> Self {
        Self {
            db,
            pending: Rc::new(RefCell::new(None)),
            subscribed: false,
        }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    fn ensure_subscribed(&mut self) -> Result<()> {
        if self.subscribed {
            return Ok(());
        }
        let pending = Rc::clone(&self.pending);
        self.db.subscribe(
            ROOT_PATH,
            Box::new(move |value| match decode_root(value) {
                Ok(inventory) => {
                    debug!(racks = inventory.racks.len(), "remote update received");
                    *pending.borrow_mut() = Some(inventory);
                }
                Err(e) => warn!(error = %e, "ignoring undecodable remote inventory"),
            }),
        )?;
        self.subscribed = true;
        Ok(())
    }

    fn write(&self, mutation: &Mutation, inventory: &Inventory) -> Result<()> {
        match mutation {
            Mutation::RackCreated(rack) => {
                let entry = RemoteRack {
                    boxes: rack.boxes.clone(),
                    created_at: Utc::now().timestamp_millis(),
                };
                let value = serde_json::to_value(entry).map_err(RackzError::Serialization)?;
                self.db.set(&rack_path(&rack.id), &value)
            }
            Mutation::RackDeleted(rack_id) => self.db.remove(&rack_path(rack_id)),
            Mutation::BoxesChanged(rack) => {
                let value =
                    serde_json::to_value(&rack.boxes).map_err(RackzError::Serialization)?;
                self.db.set(&boxes_path(&rack.id), &value)
            }
            Mutation::Replaced => self.db.set(ROOT_PATH, &encode_root(inventory)?),
        }
    }
}

impl<D: RemoteDatabase> InventoryStore for RemoteStore<D> {
    fn load(&mut self) -> Result<Inventory> {
        self.ensure_subscribed()?;
        self.pending.borrow_mut().take();

        match self.db.get(ROOT_PATH).and_then(|value| decode_root(&value)) {
            Ok(inventory) => Ok(inventory),
            Err(e) => {
                warn!(error = %e, "remote inventory unavailable. Starting fresh.");
                Ok(Inventory::default())
            }
        }
    }

    fn persist(&mut self, mutation: &Mutation, inventory: &Inventory) -> Result<()> {
        debug!(?mutation, "remote write");
        if let Err(e) = self.write(mutation, inventory) {
            warn!(error = %e, "remote write failed");
        }
        Ok(())
    }

    fn take_update(&mut self) -> Result<Option<Inventory>> {
        if self.subscribed && self.pending.borrow().is_none() {
            if let Err(e) = self.db.poll() {
                warn!(error = %e, "remote poll failed");
            }
        }
        Ok(self.pending.borrow_mut().take())
    }

    fn describe(&self) -> String {
        "remote".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FiledDocument;
    use serde_json::json;

    #[test]
    fn paths_overlap_by_prefix() {
        assert!(paths_overlap("inventory", "inventory/SSS-RACK-1/boxes"));
        assert!(paths_overlap("inventory/SSS-RACK-1", "inventory"));
        assert!(paths_overlap("", "inventory"));
        assert!(!paths_overlap("inventory/A", "inventory/B"));
        assert!(!paths_overlap("settings", "inventory"));
    }

    #[test]
    fn decode_null_root_is_empty() {
        assert!(decode_root(&Value::Null).unwrap().is_empty());
        assert!(decode_root(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn decode_orders_by_creation_then_suffix() {
        let value = json!({
            "SSS-RACK-10": { "createdAt": 5 },
            "SSS-RACK-2": { "createdAt": 5, "boxes": [{ "id": 1 }] },
            "SSS-RACK-1": { "createdAt": 9 },
        });
        let inv = decode_root(&value).unwrap();
        let ids: Vec<&str> = inv.racks.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["SSS-RACK-2", "SSS-RACK-10", "SSS-RACK-1"]);
        assert_eq!(inv.racks[0].boxes.len(), 1);
    }

    #[test]
    fn decode_rejects_unexpected_shape() {
        assert!(decode_root(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn encode_root_round_trips_in_order() {
        let mut rack = Rack::new("SSS-RACK-3");
        rack.boxes.push(FileBox::new(1));
        rack.boxes[0]
            .files
            .push(FiledDocument::new("2024-02-02", "N-1", "Alan Turing", ""));
        let inventory = Inventory::new(vec![rack, Rack::new("SSS-RACK-1")]);

        let decoded = decode_root(&encode_root(&inventory).unwrap()).unwrap();
        assert_eq!(decoded, inventory);
    }

    #[test]
    fn mutations_become_targeted_writes() {
        let db = MemoryDatabase::new();
        let mut store = RemoteStore::new(db.clone());
        store.load().unwrap();

        let rack = Rack::new("SSS-RACK-1");
        let inv = Inventory::new(vec![rack.clone()]);
        store
            .persist(&Mutation::RackCreated(rack.clone()), &inv)
            .unwrap();
        assert!(db.get("inventory/SSS-RACK-1/createdAt").unwrap().is_i64());

        let mut changed = rack.clone();
        changed.boxes.push(FileBox::new(1));
        store
            .persist(&Mutation::BoxesChanged(changed), &inv)
            .unwrap();
        assert_eq!(
            db.get("inventory/SSS-RACK-1/boxes").unwrap(),
            json!([{ "id": 1, "files": [] }])
        );

        store
            .persist(&Mutation::RackDeleted("SSS-RACK-1".into()), &inv)
            .unwrap();
        assert!(db.get("inventory/SSS-RACK-1").unwrap().is_null());
    }

    #[test]
    fn writes_echo_back_as_pending_update() {
        let db = MemoryDatabase::new();
        let mut store = RemoteStore::new(db);
        assert!(store.load().unwrap().is_empty());
        assert!(store.take_update().unwrap().is_none());

        let rack = Rack::new("SSS-RACK-1");
        let inv = Inventory::new(vec![rack.clone()]);
        store.persist(&Mutation::RackCreated(rack), &inv).unwrap();

        let update = store.take_update().unwrap().unwrap();
        assert_eq!(update, inv);
        assert!(store.take_update().unwrap().is_none());
    }

    #[test]
    fn other_clients_see_writes() {
        let db = MemoryDatabase::new();
        let mut a = RemoteStore::new(db.clone());
        let mut b = RemoteStore::new(db);
        a.load().unwrap();
        b.load().unwrap();

        let rack = Rack::new("SSS-RACK-1");
        let inv = Inventory::new(vec![rack.clone()]);
        a.persist(&Mutation::RackCreated(rack), &inv).unwrap();

        let seen = b.take_update().unwrap().unwrap();
        assert_eq!(seen.racks[0].id, "SSS-RACK-1");
    }

    #[test]
    fn failed_writes_are_swallowed() {
        let db = MemoryDatabase::new();
        let mut store = RemoteStore::new(db.clone());
        store.load().unwrap();
        db.set_fail_writes(true);

        let rack = Rack::new("SSS-RACK-1");
        let inv = Inventory::new(vec![rack.clone()]);
        assert!(store.persist(&Mutation::RackCreated(rack), &inv).is_ok());
        assert!(store.take_update().unwrap().is_none());
        assert!(db.get(ROOT_PATH).unwrap().is_null());
    }
}
