//! # Navigation Context
//!
//! Tracks which rack (and which box inside it) a client currently has open.
//! Racks are remembered by identifier and boxes by box id, never by position,
//! so a wholesale replacement of the inventory cannot silently point an open
//! view at a different rack or box. After every replacement the context is
//! [`reconcile`](NavigationContext::reconcile)d: whatever no longer exists is
//! closed.

use crate::model::{FileBox, Inventory, Rack};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    rack: Option<String>,
    #[serde(rename = "box")]
    box_id: Option<u32>,
}

impl NavigationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rack_id(&self) -> Option<&str> {
        self.rack.as_deref()
    }

    pub fn box_id(&self) -> Option<u32> {
        self.box_id
    }

    /// Opens a rack. Any open box is closed.
    pub fn open_rack(&mut self, rack_id: impl Into<String>) {
        self.rack = Some(rack_id.into());
        self.box_id = None;
    }

    pub fn open_box(&mut self, rack_id: impl Into<String>, box_id: u32) {
        self.rack = Some(rack_id.into());
        self.box_id = Some(box_id);
    }

    /// Back to the rack view.
    pub fn close_box(&mut self) {
        self.box_id = None;
    }

    pub fn close(&mut self) {
        self.rack = None;
        self.box_id = None;
    }

    pub fn current_rack<'a>(&self, inventory: &'a Inventory) -> Option<&'a Rack> {
        self.rack.as_deref().and_then(|id| inventory.find_rack(id))
    }

    pub fn current_box<'a>(&self, inventory: &'a Inventory) -> Option<&'a FileBox> {
        let rack = self.current_rack(inventory)?;
        self.box_id.and_then(|id| rack.find_box(id))
    }

    /// Drops selections that no longer exist in `inventory`.
    ///
    /// Returns `true` when something was closed.
    pub fn reconcile(&mut self, inventory: &Inventory) -> bool {
        let before = self.clone();
        match self.current_rack(inventory) {
            None => self.close(),
            Some(rack) => {
                if let Some(box_id) = self.box_id {
                    if rack.find_box(box_id).is_none() {
                        self.box_id = None;
                    }
                }
            }
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileBox, Rack};

    fn inventory() -> Inventory {
        let mut rack = Rack::new("SSS-RACK-1");
        rack.boxes.push(FileBox::new(1));
        rack.boxes.push(FileBox::new(2));
        Inventory::new(vec![rack, Rack::new("SSS-RACK-2")])
    }

    #[test]
    fn opening_a_rack_closes_the_box() {
        let mut nav = NavigationContext::new();
        nav.open_box("SSS-RACK-1", 2);
        nav.open_rack("SSS-RACK-2");
        assert_eq!(nav.rack_id(), Some("SSS-RACK-2"));
        assert_eq!(nav.box_id(), None);
    }

    #[test]
    fn current_box_follows_id_not_position() {
        let mut inv = inventory();
        let mut nav = NavigationContext::new();
        nav.open_box("SSS-RACK-1", 2);

        inv.racks[0].boxes.remove(0);
        assert_eq!(nav.current_box(&inv).map(|b| b.id), Some(2));
    }

    #[test]
    fn reconcile_closes_vanished_box() {
        let mut inv = inventory();
        let mut nav = NavigationContext::new();
        nav.open_box("SSS-RACK-1", 2);

        inv.racks[0].boxes.pop();
        assert!(nav.reconcile(&inv));
        assert_eq!(nav.rack_id(), Some("SSS-RACK-1"));
        assert_eq!(nav.box_id(), None);
    }

    #[test]
    fn reconcile_closes_vanished_rack() {
        let mut nav = NavigationContext::new();
        nav.open_box("SSS-RACK-1", 1);

        assert!(nav.reconcile(&Inventory::default()));
        assert_eq!(nav, NavigationContext::new());
    }

    #[test]
    fn reconcile_keeps_valid_selection() {
        let mut nav = NavigationContext::new();
        nav.open_box("SSS-RACK-1", 1);
        assert!(!nav.reconcile(&inventory()));
        assert_eq!(nav.box_id(), Some(1));
    }
}
