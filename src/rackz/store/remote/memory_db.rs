use super::{paths_overlap, segments, Listener, RemoteDatabase};
use crate::error::{RackzError, Result};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

struct Subscriber {
    path: String,
    listener: Listener,
}

#[derive(Default)]
struct Hub {
    root: Value,
    subscribers: Vec<Subscriber>,
    fail_writes: bool,
}

/// In-process realtime database.
///
/// Clones share one hub, so each clone behaves like a separate client
/// connected to the same database: a write through one clone notifies the
/// listeners registered through every other clone.
///
/// Uses `Rc<RefCell<_>>` since rackz is single-threaded.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    hub: Rc<RefCell<Hub>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, for testing error handling.
    pub fn set_fail_writes(&self, fail: bool) {
        self.hub.borrow_mut().fail_writes = fail;
    }

    fn check_writable(&self) -> Result<()> {
        if self.hub.borrow().fail_writes {
            return Err(RackzError::Remote("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn read(&self, path: &str) -> Value {
        let hub = self.hub.borrow();
        let mut node = &hub.root;
        for seg in segments(path) {
            match node.get(seg) {
                Some(child) => node = child,
                None => return Value::Null,
            }
        }
        node.clone()
    }

    /// Fires every listener whose path overlaps `written`.
    ///
    /// Listeners are taken out of the hub while they run so they may read
    /// from (or subscribe to) the database without a double borrow.
    fn notify(&self, written: &str) {
        let mut subscribers = std::mem::take(&mut self.hub.borrow_mut().subscribers);
        for sub in subscribers.iter_mut() {
            if paths_overlap(&sub.path, written) {
                let value = self.read(&sub.path);
                (sub.listener)(&value);
            }
        }
        let mut hub = self.hub.borrow_mut();
        subscribers.append(&mut hub.subscribers);
        hub.subscribers = subscribers;
    }
}

/// The child `key` of `node`, turning `node` into an object first if needed.
fn child_mut<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    &mut node[key]
}

impl RemoteDatabase for MemoryDatabase {
    fn get(&self, path: &str) -> Result<Value> {
        Ok(self.read(path))
    }

    fn set(&self, path: &str, value: &Value) -> Result<()> {
        if value.is_null() {
            return self.remove(path);
        }
        self.check_writable()?;
        {
            let mut hub = self.hub.borrow_mut();
            let segs = segments(path);
            match segs.split_last() {
                None => hub.root = value.clone(),
                Some((last, parents)) => {
                    let mut node = &mut hub.root;
                    for seg in parents {
                        node = child_mut(node, seg);
                    }
                    *child_mut(node, last) = value.clone();
                }
            }
        }
        self.notify(path);
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<()> {
        self.check_writable()?;
        {
            let mut hub = self.hub.borrow_mut();
            let segs = segments(path);
            match segs.split_last() {
                None => hub.root = Value::Null,
                Some((last, parents)) => {
                    let mut node = Some(&mut hub.root);
                    for seg in parents {
                        node = node.and_then(|n| n.get_mut(*seg));
                    }
                    if let Some(Value::Object(map)) = node {
                        map.remove(*last);
                    }
                }
            }
        }
        self.notify(path);
        Ok(())
    }

    fn subscribe(&self, path: &str, mut listener: Listener) -> Result<()> {
        listener(&self.read(path));
        self.hub.borrow_mut().subscribers.push(Subscriber {
            path: path.to_string(),
            listener,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn set_creates_intermediate_objects() {
        let db = MemoryDatabase::new();
        db.set("inventory/R1/boxes", &json!([1, 2])).unwrap();
        assert_eq!(db.get("inventory").unwrap(), json!({ "R1": { "boxes": [1, 2] } }));
        assert!(db.get("inventory/R2").unwrap().is_null());
    }

    #[test]
    fn remove_drops_subtree() {
        let db = MemoryDatabase::new();
        db.set("inventory/R1", &json!({ "createdAt": 1 })).unwrap();
        db.set("inventory/R2", &json!({ "createdAt": 2 })).unwrap();
        db.remove("inventory/R1").unwrap();
        assert_eq!(db.get("inventory").unwrap(), json!({ "R2": { "createdAt": 2 } }));
    }

    #[test]
    fn setting_null_removes() {
        let db = MemoryDatabase::new();
        db.set("a/b", &json!(1)).unwrap();
        db.set("a/b", &Value::Null).unwrap();
        assert_eq!(db.get("a").unwrap(), json!({}));
    }

    #[test]
    fn listeners_fire_on_subscribe_and_on_overlapping_writes() {
        let db = MemoryDatabase::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        db.subscribe("inventory", Box::new(move |_| seen.set(seen.get() + 1)))
            .unwrap();
        assert_eq!(calls.get(), 1);

        db.set("inventory/R1/boxes", &json!([])).unwrap();
        assert_eq!(calls.get(), 2);

        db.set("settings/theme", &json!("dark")).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn clones_share_state() {
        let a = MemoryDatabase::new();
        let b = a.clone();
        a.set("x", &json!(true)).unwrap();
        assert_eq!(b.get("x").unwrap(), json!(true));
    }

    #[test]
    fn failing_writes_leave_state_untouched() {
        let db = MemoryDatabase::new();
        db.set_fail_writes(true);
        assert!(matches!(
            db.set("x", &json!(1)),
            Err(RackzError::Remote(_))
        ));
        assert!(db.get("x").unwrap().is_null());
    }
}
