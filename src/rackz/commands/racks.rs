use crate::commands::{CmdMessage, CmdResult, Confirm};
use crate::error::{RackzError, Result};
use crate::model::{Inventory, Rack, MAX_BOXES};
use crate::store::{InventoryStore, Mutation};
use tracing::debug;

use super::helpers::{rack_by_selector, resolve_rack};

/// Appends a new empty rack numbered one past the highest existing suffix.
pub fn add<S: InventoryStore>(inventory: &mut Inventory, store: &mut S) -> Result<CmdResult> {
    let id = inventory.next_rack_id().ok_or_else(|| {
        RackzError::Validation("Rack numbering exhausted above the highest rack".into())
    })?;
    let rack = Rack::new(id);
    debug!(rack = %rack.id, "adding rack");
    inventory.racks.push(rack.clone());
    store.persist(&Mutation::RackCreated(rack.clone()), inventory)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Rack added: {}", rack.id)));
    Ok(result.with_affected_racks(vec![rack]))
}

/// Removes the selected rack (id or 1-based position), after confirmation.
pub fn delete<S: InventoryStore>(
    inventory: &mut Inventory,
    store: &mut S,
    selector: &str,
    confirm: &dyn Confirm,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let Ok(pos) = resolve_rack(inventory, selector) else {
        result.add_message(CmdMessage::info(format!("No rack named {}.", selector)));
        return Ok(result);
    };

    if !confirm.confirm(&format!("Delete {}?", inventory.racks[pos].id)) {
        result.add_message(CmdMessage::info("Operation cancelled."));
        return Ok(result);
    }

    let rack = inventory.racks.remove(pos);
    store.persist(&Mutation::RackDeleted(rack.id.clone()), inventory)?;
    result.add_message(CmdMessage::success(format!("Rack deleted: {}", rack.id)));
    Ok(result.with_affected_racks(vec![rack]))
}

/// Rack view: the rack's boxes with their contents.
pub fn view(inventory: &Inventory, selector: &str) -> Result<CmdResult> {
    let rack = rack_by_selector(inventory, selector)?;
    let boxes = rack
        .boxes
        .iter()
        .map(|b| (rack.id.clone(), b.clone()))
        .collect();

    let mut result = CmdResult::default()
        .with_affected_racks(vec![rack.clone()])
        .with_listed_boxes(boxes);
    result.add_message(CmdMessage::info(format!(
        "{}: {} / {} Boxes",
        rack.id,
        rack.boxes.len(),
        MAX_BOXES
    )));
    Ok(result)
}
