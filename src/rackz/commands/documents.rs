use crate::commands::{CmdMessage, CmdResult, DocumentEntry, NewDocument};
use crate::error::{RackzError, Result};
use crate::model::{FiledDocument, Inventory, MAX_FILES_PER_BOX};
use crate::store::{InventoryStore, Mutation};
use tracing::debug;

use super::helpers::resolve_rack;

/// Files a new document into a box.
///
/// File number and full name are required; nothing is checked beyond presence.
pub fn add<S: InventoryStore>(
    inventory: &mut Inventory,
    store: &mut S,
    rack: &str,
    box_id: u32,
    fields: NewDocument,
) -> Result<CmdResult> {
    if fields.full_name.is_empty() || fields.file_number.is_empty() {
        return Err(RackzError::Validation(
            "Name and File Number required".to_string(),
        ));
    }

    let pos = resolve_rack(inventory, rack)?;
    let target_rack = &mut inventory.racks[pos];
    let rack_id = target_rack.id.clone();
    let target_box = target_rack
        .find_box_mut(box_id)
        .ok_or_else(|| RackzError::BoxNotFound {
            rack_id: rack_id.clone(),
            box_id,
        })?;

    if target_box.is_full() {
        return Err(RackzError::BoxFull {
            rack_id,
            box_id,
            max: MAX_FILES_PER_BOX,
        });
    }

    let document = FiledDocument {
        date: fields.date,
        file_number: fields.file_number,
        full_name: fields.full_name,
        label: fields.label,
    };
    debug!(rack = %rack_id, box_id, file_number = %document.file_number, "filing document");
    target_box.files.push(document.clone());
    let position = target_box.files.len();
    let changed = target_rack.clone();

    store.persist(&Mutation::BoxesChanged(changed.clone()), inventory)?;

    let mut result = CmdResult::default().with_listed_documents(vec![DocumentEntry {
        rack_id: rack_id.clone(),
        box_id,
        position,
        document: document.clone(),
    }]);
    result.add_message(CmdMessage::success(format!(
        "Filed {} - {} in {} box {} ({}/{})",
        document.file_number, document.full_name, rack_id, box_id, position, MAX_FILES_PER_BOX
    )));
    Ok(result.with_affected_racks(vec![changed]))
}

/// Removes the document at a 1-based position. No confirmation.
pub fn delete<S: InventoryStore>(
    inventory: &mut Inventory,
    store: &mut S,
    rack: &str,
    box_id: u32,
    position: usize,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let pos = resolve_rack(inventory, rack)?;
    let target_rack = &mut inventory.racks[pos];
    let rack_id = target_rack.id.clone();

    let Some(target_box) = target_rack.find_box_mut(box_id) else {
        result.add_message(CmdMessage::info(format!(
            "No box {} in {}.",
            box_id, rack_id
        )));
        return Ok(result);
    };

    if position == 0 || position > target_box.files.len() {
        result.add_message(CmdMessage::info(format!(
            "No file at position {} in box {}.",
            position, box_id
        )));
        return Ok(result);
    }

    let removed = target_box.files.remove(position - 1);
    let changed = target_rack.clone();
    store.persist(&Mutation::BoxesChanged(changed.clone()), inventory)?;

    result.add_message(CmdMessage::success(format!(
        "Removed {} - {} from {} box {}",
        removed.file_number, removed.full_name, rack_id, box_id
    )));
    Ok(result.with_affected_racks(vec![changed]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::InventoryFixture;
    use crate::store::memory::InMemoryStore;

    fn fields(number: &str, name: &str) -> NewDocument {
        NewDocument {
            date: "2024-05-06".into(),
            file_number: number.into(),
            full_name: name.into(),
            label: "hr".into(),
        }
    }

    #[test]
    fn add_appends_document() {
        let mut inv = InventoryFixture::new().with_filled_rack(1, 0).build();
        let mut store = InMemoryStore::new();

        let result = add(&mut inv, &mut store, "SSS-RACK-1", 1, fields("F-1", "Ada")).unwrap();
        let files = &inv.racks[0].boxes[0].files;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].label, "hr");
        assert_eq!(files[0].date, "2024-05-06");
        assert_eq!(result.listed_documents[0].position, 1);
        assert_eq!(store.saved(), &inv);
    }

    #[test]
    fn add_requires_file_number_and_name() {
        let mut inv = InventoryFixture::new().with_filled_rack(1, 0).build();
        let mut store = InMemoryStore::new();

        for (number, name) in [("", "Ada"), ("F-1", ""), ("", "")] {
            let err = add(&mut inv, &mut store, "SSS-RACK-1", 1, fields(number, name)).unwrap_err();
            assert!(matches!(err, RackzError::Validation(_)));
        }
        assert!(inv.racks[0].boxes[0].files.is_empty());
        assert!(store.mutations().is_empty());
    }

    #[test]
    fn add_empty_label_is_fine() {
        let mut inv = InventoryFixture::new().with_filled_rack(1, 0).build();
        let mut store = InMemoryStore::new();
        let mut f = fields("F-1", "Ada");
        f.label.clear();
        f.date.clear();

        add(&mut inv, &mut store, "SSS-RACK-1", 1, f).unwrap();
        assert_eq!(inv.racks[0].boxes[0].files.len(), 1);
    }

    #[test]
    fn add_rejects_full_box() {
        let mut inv = InventoryFixture::new()
            .with_filled_rack(1, MAX_FILES_PER_BOX)
            .build();
        let mut store = InMemoryStore::new();

        let err = add(&mut inv, &mut store, "SSS-RACK-1", 1, fields("F-X", "Ada")).unwrap_err();
        assert!(matches!(err, RackzError::BoxFull { max: 100, .. }));
        assert_eq!(inv.racks[0].boxes[0].files.len(), MAX_FILES_PER_BOX);
    }

    #[test]
    fn add_to_unknown_box_fails() {
        let mut inv = InventoryFixture::new().with_filled_rack(1, 0).build();
        let mut store = InMemoryStore::new();
        assert!(matches!(
            add(&mut inv, &mut store, "SSS-RACK-1", 2, fields("F-1", "Ada")),
            Err(RackzError::BoxNotFound { box_id: 2, .. })
        ));
    }

    #[test]
    fn delete_removes_by_position() {
        let mut inv = InventoryFixture::new().with_filled_rack(1, 3).build();
        let mut store = InMemoryStore::new();

        delete(&mut inv, &mut store, "SSS-RACK-1", 1, 2).unwrap();
        let numbers: Vec<&str> = inv.racks[0].boxes[0]
            .files
            .iter()
            .map(|f| f.file_number.as_str())
            .collect();
        assert_eq!(numbers, ["SSS-RACK-1-B1-F1", "SSS-RACK-1-B1-F3"]);
        assert_eq!(store.mutations().len(), 1);
    }

    #[test]
    fn delete_out_of_range_is_a_no_op() {
        let mut inv = InventoryFixture::new().with_filled_rack(1, 2).build();
        let mut store = InMemoryStore::new();

        delete(&mut inv, &mut store, "SSS-RACK-1", 1, 0).unwrap();
        delete(&mut inv, &mut store, "SSS-RACK-1", 1, 3).unwrap();
        delete(&mut inv, &mut store, "SSS-RACK-1", 4, 1).unwrap();
        assert_eq!(inv.racks[0].boxes[0].files.len(), 2);
        assert!(store.mutations().is_empty());
    }
}
