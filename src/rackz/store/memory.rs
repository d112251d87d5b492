use super::{InventoryStore, Mutation};
use crate::error::{RackzError, Result};
use crate::model::Inventory;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    saved: Inventory,
    mutations: Vec<Mutation>,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(inventory: Inventory) -> Self {
        Self {
            saved: inventory,
            ..Self::default()
        }
    }

    /// Last persisted inventory.
    pub fn saved(&self) -> &Inventory {
        &self.saved
    }

    /// Every mutation persisted so far, oldest first.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }
}

impl InventoryStore for InMemoryStore {
    fn load(&mut self) -> Result<Inventory> {
        Ok(self.saved.clone())
    }

    fn persist(&mut self, mutation: &Mutation, inventory: &Inventory) -> Result<()> {
        if self.simulate_write_error {
            return Err(RackzError::Store("Simulated write error".to_string()));
        }
        self.mutations.push(mutation.clone());
        self.saved = inventory.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::{FileBox, FiledDocument, Inventory, Rack};

    /// Builds an [`Inventory`] rack by rack for tests.
    #[derive(Default)]
    pub struct InventoryFixture {
        pub inventory: Inventory,
    }

    impl InventoryFixture {
        pub fn new() -> Self {
            Self::default()
        }

        /// Appends `count` empty racks, numbered after the existing ones.
        pub fn with_racks(mut self, count: usize) -> Self {
            for _ in 0..count {
                let rack = Rack::new(self.next_id());
                self.inventory.racks.push(rack);
            }
            self
        }

        /// Appends a rack with `boxes` boxes holding `files_per_box` documents each.
        pub fn with_filled_rack(mut self, boxes: usize, files_per_box: usize) -> Self {
            let mut rack = Rack::new(self.next_id());
            for b in 0..boxes {
                let mut file_box = FileBox::new(b as u32 + 1);
                for f in 0..files_per_box {
                    file_box.files.push(FiledDocument::new(
                        "2024-01-15",
                        format!("{}-B{}-F{}", rack.id, b + 1, f + 1),
                        format!("Person {}", f + 1),
                        "",
                    ));
                }
                rack.boxes.push(file_box);
            }
            self.inventory.racks.push(rack);
            self
        }

        pub fn with_document(mut self, rack_id: &str, box_id: u32, doc: FiledDocument) -> Self {
            let pos = match self.inventory.rack_position(rack_id) {
                Some(pos) => pos,
                None => {
                    self.inventory.racks.push(Rack::new(rack_id));
                    self.inventory.racks.len() - 1
                }
            };
            let rack = &mut self.inventory.racks[pos];
            match rack.find_box_mut(box_id) {
                Some(file_box) => file_box.files.push(doc),
                None => {
                    let mut file_box = FileBox::new(box_id);
                    file_box.files.push(doc);
                    rack.boxes.push(file_box);
                }
            }
            self
        }

        fn next_id(&self) -> String {
            self.inventory
                .next_rack_id()
                .expect("fixture racks stay far below the numbering ceiling")
        }

        pub fn build(self) -> Inventory {
            self.inventory
        }
    }
}
