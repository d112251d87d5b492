use crate::commands::{CmdMessage, CmdResult, Confirm, DocumentEntry};
use crate::error::{RackzError, Result};
use crate::model::{FileBox, Inventory, MAX_BOXES, MAX_FILES_PER_BOX};
use crate::store::{InventoryStore, Mutation};
use tracing::debug;

use super::helpers::{box_in_rack, rack_by_selector, resolve_rack};

/// Appends an empty box to the selected rack, unless it is full.
pub fn add<S: InventoryStore>(
    inventory: &mut Inventory,
    store: &mut S,
    rack: &str,
) -> Result<CmdResult> {
    let pos = resolve_rack(inventory, rack)?;
    let target = &mut inventory.racks[pos];

    if target.is_full() {
        return Err(RackzError::RackFull {
            rack_id: target.id.clone(),
            max: MAX_BOXES,
        });
    }

    let Some(box_id) = target.next_box_id() else {
        return Err(RackzError::Validation(format!(
            "Box numbering exhausted on {}",
            target.id
        )));
    };
    let file_box = FileBox::new(box_id);
    debug!(rack = %target.id, box_id = file_box.id, "adding box");
    target.boxes.push(file_box.clone());
    let changed = target.clone();

    store.persist(&Mutation::BoxesChanged(changed.clone()), inventory)?;

    let mut result = CmdResult::default()
        .with_listed_boxes(vec![(changed.id.clone(), file_box.clone())]);
    result.add_message(CmdMessage::success(format!(
        "Box {} added to {} ({} / {})",
        file_box.id,
        changed.id,
        changed.boxes.len(),
        MAX_BOXES
    )));
    Ok(result.with_affected_racks(vec![changed]))
}

/// Removes a box from the selected rack, after confirmation.
pub fn delete<S: InventoryStore>(
    inventory: &mut Inventory,
    store: &mut S,
    rack: &str,
    box_id: u32,
    confirm: &dyn Confirm,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let pos = resolve_rack(inventory, rack)?;
    let target = &mut inventory.racks[pos];

    let Some(box_pos) = target.boxes.iter().position(|b| b.id == box_id) else {
        result.add_message(CmdMessage::info(format!(
            "No box {} in {}.",
            box_id, target.id
        )));
        return Ok(result);
    };

    if !confirm.confirm("Delete this box?") {
        result.add_message(CmdMessage::info("Operation cancelled."));
        return Ok(result);
    }

    let removed = target.boxes.remove(box_pos);
    let changed = target.clone();
    store.persist(&Mutation::BoxesChanged(changed.clone()), inventory)?;

    result.add_message(CmdMessage::success(format!(
        "Box {} deleted from {} ({} files removed)",
        removed.id,
        changed.id,
        removed.files.len()
    )));
    Ok(result.with_affected_racks(vec![changed]))
}

/// Box view: the box's documents with their positions.
pub fn view(inventory: &Inventory, rack: &str, box_id: u32) -> Result<CmdResult> {
    let rack = rack_by_selector(inventory, rack)?;
    let file_box = box_in_rack(rack, box_id)?;

    let documents = file_box
        .files
        .iter()
        .enumerate()
        .map(|(i, doc)| DocumentEntry {
            rack_id: rack.id.clone(),
            box_id: file_box.id,
            position: i + 1,
            document: doc.clone(),
        })
        .collect();

    let mut result = CmdResult::default()
        .with_listed_boxes(vec![(rack.id.clone(), file_box.clone())])
        .with_listed_documents(documents);
    result.add_message(CmdMessage::info(format!(
        "BOX #{}: {}/{} Files",
        file_box.id,
        file_box.files.len(),
        MAX_FILES_PER_BOX
    )));
    Ok(result)
}
