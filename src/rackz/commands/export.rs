use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Inventory;
use crate::store::snapshot::write_snapshot;
use std::path::Path;

use super::stats;

/// Writes the whole inventory as a snapshot file at `path`.
pub fn run(inventory: &Inventory, path: &Path) -> Result<CmdResult> {
    write_snapshot(path, inventory)?;

    let totals = stats::compute(inventory);
    let mut result = CmdResult::default().with_stats(totals);
    result.exported_to = Some(path.to_path_buf());
    result.add_message(CmdMessage::success(format!(
        "Inventory exported to {} ({} racks, {} boxes, {} files)",
        path.display(),
        totals.racks,
        totals.boxes,
        totals.documents
    )));
    Ok(result)
}
