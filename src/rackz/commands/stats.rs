use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Inventory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryStats {
    pub racks: usize,
    pub boxes: usize,
    pub documents: usize,
}

pub fn compute(inventory: &Inventory) -> InventoryStats {
    InventoryStats {
        racks: inventory.racks.len(),
        boxes: inventory.racks.iter().map(|r| r.boxes.len()).sum(),
        documents: inventory.racks.iter().map(|r| r.document_count()).sum(),
    }
}

pub fn run(inventory: &Inventory) -> Result<CmdResult> {
    Ok(CmdResult::default().with_stats(compute(inventory)))
}
