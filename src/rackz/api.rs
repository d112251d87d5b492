//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for rackz operations, whichever client drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the state**: the working [`Inventory`] and the client's
//!   [`NavigationContext`]
//! - **Dispatches** to the appropriate command function
//! - **Synchronizes** after every mutation: an authoritative update published
//!   by the store replaces the working inventory wholesale, and the navigation
//!   context is reconciled against it
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or prompting (confirmation is
//!   injected through [`Confirm`])
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Generic Over InventoryStore
//!
//! `RackzApi<S: InventoryStore>` is generic over the persistence backend:
//! - Production: `RackzApi<SnapshotStore>` or `RackzApi<RemoteStore<RestDatabase>>`
//! - Testing: `RackzApi<InMemoryStore>` or `RackzApi<RemoteStore<MemoryDatabase>>`

use crate::commands::{self, helpers, Confirm};
use crate::error::Result;
use crate::model::Inventory;
use crate::navigation::NavigationContext;
use crate::store::snapshot::SnapshotStore;
use crate::store::InventoryStore;
use std::path::Path;
use tracing::debug;

/// The main API facade for rackz operations.
pub struct RackzApi<S: InventoryStore> {
    store: S,
    inventory: Inventory,
    nav: NavigationContext,
}

impl<S: InventoryStore> RackzApi<S> {
    /// Loads the inventory from `store` and starts with nothing open.
    pub fn open(mut store: S) -> Result<Self> {
        let inventory = store.load()?;
        debug!(store = %store.describe(), racks = inventory.racks.len(), "inventory loaded");
        Ok(Self {
            store,
            inventory,
            nav: NavigationContext::new(),
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn navigation(&self) -> &NavigationContext {
        &self.nav
    }

    /// Restores a saved navigation context. Selections that no longer exist
    /// are closed.
    pub fn set_navigation(&mut self, nav: NavigationContext) {
        self.nav = nav;
        self.nav.reconcile(&self.inventory);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn add_rack(&mut self) -> Result<commands::CmdResult> {
        let result = commands::racks::add(&mut self.inventory, &mut self.store)?;
        self.sync()?;
        Ok(result)
    }

    /// Deletes a rack by id or 1-based position.
    pub fn delete_rack(
        &mut self,
        rack: &str,
        confirm: &dyn Confirm,
    ) -> Result<commands::CmdResult> {
        let result =
            commands::racks::delete(&mut self.inventory, &mut self.store, rack, confirm)?;
        self.sync()?;
        Ok(result)
    }

    pub fn list_racks(&self) -> Result<commands::CmdResult> {
        commands::list::racks(&self.inventory)
    }

    /// Opens a rack (by id or 1-based position) and lists its boxes.
    pub fn open_rack(&mut self, rack: &str) -> Result<commands::CmdResult> {
        let result = commands::racks::view(&self.inventory, rack)?;
        let rack_id = helpers::rack_by_selector(&self.inventory, rack)?.id.clone();
        self.nav.open_rack(rack_id);
        Ok(result)
    }

    /// Back to the shelf.
    pub fn close_rack(&mut self) -> Result<commands::CmdResult> {
        self.nav.close();
        commands::list::racks(&self.inventory)
    }

    pub fn add_box(&mut self, rack: &str) -> Result<commands::CmdResult> {
        let result = commands::boxes::add(&mut self.inventory, &mut self.store, rack)?;
        self.sync()?;
        Ok(result)
    }

    pub fn delete_box(
        &mut self,
        rack: &str,
        box_id: u32,
        confirm: &dyn Confirm,
    ) -> Result<commands::CmdResult> {
        let result =
            commands::boxes::delete(&mut self.inventory, &mut self.store, rack, box_id, confirm)?;
        self.sync()?;
        Ok(result)
    }

    /// Opens a box and lists its documents.
    pub fn open_box(&mut self, rack: &str, box_id: u32) -> Result<commands::CmdResult> {
        let result = commands::boxes::view(&self.inventory, rack, box_id)?;
        let rack_id = helpers::rack_by_selector(&self.inventory, rack)?.id.clone();
        self.nav.open_box(rack_id, box_id);
        Ok(result)
    }

    /// Back to the rack view. A no-op when no rack is open.
    pub fn close_box(&mut self) -> Result<commands::CmdResult> {
        self.nav.close_box();
        match self.nav.rack_id() {
            Some(rack_id) => {
                let rack_id = rack_id.to_string();
                commands::racks::view(&self.inventory, &rack_id)
            }
            None => commands::list::racks(&self.inventory),
        }
    }

    pub fn add_document(
        &mut self,
        rack: &str,
        box_id: u32,
        fields: commands::NewDocument,
    ) -> Result<commands::CmdResult> {
        let result = commands::documents::add(
            &mut self.inventory,
            &mut self.store,
            rack,
            box_id,
            fields,
        )?;
        self.sync()?;
        Ok(result)
    }

    pub fn delete_document(
        &mut self,
        rack: &str,
        box_id: u32,
        position: usize,
    ) -> Result<commands::CmdResult> {
        let result = commands::documents::delete(
            &mut self.inventory,
            &mut self.store,
            rack,
            box_id,
            position,
        )?;
        self.sync()?;
        Ok(result)
    }

    pub fn stats(&self) -> Result<commands::CmdResult> {
        commands::stats::run(&self.inventory)
    }

    pub fn search(&self, query: &str) -> Result<commands::CmdResult> {
        commands::search::run(&self.inventory, query)
    }

    pub fn ledger(&self) -> Result<commands::CmdResult> {
        commands::list::ledger(&self.inventory)
    }

    pub fn export(&self, path: &Path) -> Result<commands::CmdResult> {
        commands::export::run(&self.inventory, path)
    }

    pub fn import(&mut self, path: &Path) -> Result<commands::CmdResult> {
        let result = commands::import::run(&mut self.inventory, &mut self.store, path)?;
        self.sync()?;
        Ok(result)
    }

    /// Applies a pending authoritative update, if the store has one.
    ///
    /// Returns `true` when the working inventory was replaced.
    pub fn refresh(&mut self) -> Result<bool> {
        self.sync()
    }

    fn sync(&mut self) -> Result<bool> {
        let replaced = match self.store.take_update()? {
            Some(fresh) => {
                debug!(racks = fresh.racks.len(), "replacing working inventory");
                self.inventory = fresh;
                true
            }
            None => false,
        };
        if self.nav.reconcile(&self.inventory) {
            debug!("navigation closed a vanished selection");
        }
        Ok(replaced)
    }
}

impl RackzApi<SnapshotStore> {
    /// Writes the working inventory to the snapshot file (manual-save mode).
    pub fn save(&mut self) -> Result<commands::CmdResult> {
        let path = self.store.path().to_path_buf();
        self.store.export(&self.inventory)?;
        let mut result = commands::CmdResult::default();
        result.exported_to = Some(path.clone());
        result.add_message(commands::CmdMessage::success(format!(
            "Saved {}",
            path.display()
        )));
        Ok(result)
    }
}

pub fn config(config_dir: &Path, action: ConfigAction) -> Result<commands::CmdResult> {
    commands::config::run(config_dir, action)
}

pub use crate::commands::config::ConfigAction;
pub use commands::{
    AssumeYes, CmdMessage, CmdResult, DocumentEntry, InventoryStats, MessageLevel, NewDocument,
    SearchOutcome,
};
