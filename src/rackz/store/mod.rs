//! # Storage Layer
//!
//! This module defines the persistence port for rackz. The [`InventoryStore`]
//! trait lets the command layer persist mutations without knowing which
//! backend is active.
//!
//! ## Implementations
//!
//! - [`snapshot::SnapshotStore`]: a JSON snapshot file (`inventory.json`)
//!   - The whole inventory is written on every mutation (autosave) or only on
//!     explicit export (manual mode)
//!   - A missing or corrupt file loads as an empty inventory
//!
//! - [`remote::RemoteStore`]: a path-addressed realtime database
//!   - Every mutation becomes a targeted write under `inventory/<rack id>`
//!   - A standing subscription delivers the authoritative state back, which
//!     replaces the local inventory wholesale
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!
//! ## Mutation Flow
//!
//! Commands mutate the local [`Inventory`] first and then call
//! [`InventoryStore::persist`] with a [`Mutation`] describing what changed
//! plus the post-mutation inventory. Backends pick whichever they need: the
//! snapshot store writes the full inventory, the remote store writes only the
//! touched subtree.
//!
//! After each mutation the API polls [`InventoryStore::take_update`]; any
//! returned inventory wins over the local one.

use crate::error::Result;
use crate::model::{Inventory, Rack};

pub mod memory;
pub mod remote;
pub mod snapshot;

/// A change that has just been applied to the local inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    RackCreated(Rack),
    RackDeleted(String),
    /// The rack's box sequence changed (box added/removed, document
    /// added/removed). Carries the rack as it is now.
    BoxesChanged(Rack),
    /// The whole inventory was replaced (import).
    Replaced,
}

/// Abstract persistence port for the inventory.
pub trait InventoryStore {
    /// Load the full inventory.
    fn load(&mut self) -> Result<Inventory>;

    /// Persist a mutation. `inventory` is the state after the mutation.
    fn persist(&mut self, mutation: &Mutation, inventory: &Inventory) -> Result<()>;

    /// Authoritative state published since the last call, if any.
    fn take_update(&mut self) -> Result<Option<Inventory>> {
        Ok(None)
    }

    /// Short human-readable backend description (for status output).
    fn describe(&self) -> String;
}

impl<S: InventoryStore + ?Sized> InventoryStore for Box<S> {
    fn load(&mut self) -> Result<Inventory> {
        (**self).load()
    }

    fn persist(&mut self, mutation: &Mutation, inventory: &Inventory) -> Result<()> {
        (**self).persist(mutation, inventory)
    }

    fn take_update(&mut self) -> Result<Option<Inventory>> {
        (**self).take_update()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
