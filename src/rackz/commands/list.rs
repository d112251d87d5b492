use crate::commands::{CmdResult, DocumentEntry};
use crate::error::Result;
use crate::model::Inventory;

/// Shelf grid: every rack in display order.
pub fn racks(inventory: &Inventory) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed_racks(inventory.racks.clone()))
}

/// Every filed document with its rack and box, in traversal order.
pub fn ledger(inventory: &Inventory) -> Result<CmdResult> {
    let entries = inventory
        .racks
        .iter()
        .flat_map(|rack| {
            rack.boxes.iter().flat_map(move |file_box| {
                file_box
                    .files
                    .iter()
                    .enumerate()
                    .map(move |(i, doc)| DocumentEntry {
                        rack_id: rack.id.clone(),
                        box_id: file_box.id,
                        position: i + 1,
                        document: doc.clone(),
                    })
            })
        })
        .collect();

    Ok(CmdResult::default().with_listed_documents(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::InventoryFixture;

    #[test]
    fn ledger_walks_racks_boxes_documents_in_order() {
        let inv = InventoryFixture::new()
            .with_filled_rack(2, 2)
            .with_racks(1)
            .with_filled_rack(1, 1)
            .build();

        let result = ledger(&inv).unwrap();
        let rows: Vec<(&str, u32, usize)> = result
            .listed_documents
            .iter()
            .map(|e| (e.rack_id.as_str(), e.box_id, e.position))
            .collect();
        assert_eq!(
            rows,
            [
                ("SSS-RACK-1", 1, 1),
                ("SSS-RACK-1", 1, 2),
                ("SSS-RACK-1", 2, 1),
                ("SSS-RACK-1", 2, 2),
                ("SSS-RACK-3", 1, 1),
            ]
        );
    }

    #[test]
    fn racks_keeps_display_order() {
        let inv = InventoryFixture::new().with_racks(3).build();
        let result = racks(&inv).unwrap();
        assert_eq!(result.listed_racks, inv.racks);
    }
}
