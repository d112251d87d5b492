use crate::error::{RackzError, Result};
use crate::model::{FileBox, Inventory, Rack};

/// Resolves a rack selector to its position in the inventory.
///
/// A selector is either a rack identifier (`SSS-RACK-3`) or a 1-based
/// display position (`3`). Identifiers win when both could match.
pub fn resolve_rack(inventory: &Inventory, selector: &str) -> Result<usize> {
    if let Some(pos) = inventory.rack_position(selector) {
        return Ok(pos);
    }
    if let Ok(n) = selector.parse::<usize>() {
        if n >= 1 && n <= inventory.racks.len() {
            return Ok(n - 1);
        }
    }
    Err(RackzError::RackNotFound(selector.to_string()))
}

pub fn rack_by_selector<'a>(inventory: &'a Inventory, selector: &str) -> Result<&'a Rack> {
    let pos = resolve_rack(inventory, selector)?;
    Ok(&inventory.racks[pos])
}

pub fn box_in_rack(rack: &Rack, box_id: u32) -> Result<&FileBox> {
    rack.find_box(box_id).ok_or_else(|| RackzError::BoxNotFound {
        rack_id: rack.id.clone(),
        box_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::InventoryFixture;

    #[test]
    fn resolves_by_id_and_position() {
        let inv = InventoryFixture::new().with_racks(3).build();
        assert_eq!(resolve_rack(&inv, "SSS-RACK-2").unwrap(), 1);
        assert_eq!(resolve_rack(&inv, "3").unwrap(), 2);
    }

    #[test]
    fn rejects_out_of_range_positions() {
        let inv = InventoryFixture::new().with_racks(2).build();
        assert!(matches!(
            resolve_rack(&inv, "0"),
            Err(RackzError::RackNotFound(_))
        ));
        assert!(resolve_rack(&inv, "3").is_err());
        assert!(resolve_rack(&inv, "SSS-RACK-9").is_err());
    }

    #[test]
    fn identifier_wins_over_position() {
        let mut inv = InventoryFixture::new().with_racks(2).build();
        inv.racks.push(Rack::new("1"));
        assert_eq!(resolve_rack(&inv, "1").unwrap(), 2);
    }
}
