use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Inventory;
use crate::store::snapshot::read_snapshot;
use crate::store::{InventoryStore, Mutation};
use std::path::Path;
use tracing::info;

use super::stats;

/// Replaces the whole inventory with the contents of a snapshot file.
///
/// The file is read strictly; on any error the inventory is left untouched.
pub fn run<S: InventoryStore>(
    inventory: &mut Inventory,
    store: &mut S,
    path: &Path,
) -> Result<CmdResult> {
    let imported = read_snapshot(path)?;
    info!(path = %path.display(), racks = imported.racks.len(), "importing snapshot");

    *inventory = imported;
    store.persist(&Mutation::Replaced, inventory)?;

    let totals = stats::compute(inventory);
    let mut result = CmdResult::default().with_stats(totals);
    result.add_message(CmdMessage::success(format!(
        "Imported {} ({} racks, {} boxes, {} files)",
        path.display(),
        totals.racks,
        totals.boxes,
        totals.documents
    )));
    Ok(result)
}
