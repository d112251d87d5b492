use colored::Colorize;
use rackz::api::{CmdMessage, DocumentEntry, InventoryStats, MessageLevel, SearchOutcome};
use rackz::model::{FileBox, Rack, MAX_BOXES, MAX_FILES_PER_BOX};
use rackz::navigation::NavigationContext;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NUMBER_WIDTH: usize = 18;
const NAME_WIDTH: usize = 28;
const LABEL_WIDTH: usize = 20;
const OPEN_MARKER: &str = "▸";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// The shelf: one line per rack with its 1-based position and box count.
pub(super) fn render_racks(racks: &[Rack], nav: &NavigationContext) -> String {
    if racks.is_empty() {
        return "No racks yet. Add one with `rackz rack add`.\n".to_string();
    }

    let mut out = String::new();
    for (i, rack) in racks.iter().enumerate() {
        let marker = if nav.rack_id() == Some(rack.id.as_str()) {
            OPEN_MARKER
        } else {
            " "
        };
        let count = format!("{} / {} Boxes", rack.boxes.len(), MAX_BOXES);
        let count = if rack.is_full() {
            count.yellow().to_string()
        } else {
            count.dimmed().to_string()
        };
        out.push_str(&format!(
            "{} {:>3}. {:<16} {}\n",
            marker,
            i + 1,
            rack.id.bold(),
            count
        ));
    }
    out
}

/// Boxes of a rack with their document counts.
pub(super) fn render_boxes(boxes: &[(String, FileBox)], nav: &NavigationContext) -> String {
    if boxes.is_empty() {
        return "This rack is empty. Add a box with `rackz box add`.\n".to_string();
    }

    let mut out = String::new();
    for (rack_id, file_box) in boxes {
        let is_open =
            nav.rack_id() == Some(rack_id.as_str()) && nav.box_id() == Some(file_box.id);
        let marker = if is_open { OPEN_MARKER } else { " " };
        out.push_str(&format!(
            "{}  BOX #{:<4} {}\n",
            marker,
            file_box.id,
            format!("{}/{} Files", file_box.files.len(), MAX_FILES_PER_BOX).dimmed()
        ));
    }
    out
}

/// Document table. With `with_location` each row also names its rack and box.
pub(super) fn render_documents(entries: &[DocumentEntry], with_location: bool) -> String {
    let mut out = String::new();
    for entry in entries {
        let doc = &entry.document;
        let location = if with_location {
            format!("{} #{:<3} ", entry.rack_id, entry.box_id)
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{}{:>4}. {} {} {} {}\n",
            location.dimmed(),
            entry.position,
            pad_to_width(&doc.file_number, NUMBER_WIDTH).cyan(),
            pad_to_width(&doc.full_name, NAME_WIDTH),
            pad_to_width(&doc.label, LABEL_WIDTH).dimmed(),
            doc.date
        ));
    }
    out
}

pub(super) fn render_search(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Prompt => format!("{}\n", "Enter search terms...".dimmed()),
        SearchOutcome::NoRecords => format!("{}\n", "No records found.".dimmed()),
        SearchOutcome::Matches(entries) => render_documents(entries, true),
    }
}

pub(super) fn render_stats(stats: &InventoryStats) -> String {
    format!(
        "Racks:     {}\nBoxes:     {}\nDocuments: {}\n",
        stats.racks.to_string().bold(),
        stats.boxes.to_string().bold(),
        stats.documents.to_string().bold()
    )
}

/// Where the client currently is, e.g. `SSS-RACK-2 › BOX #3`.
pub(super) fn render_location(nav: &NavigationContext) -> String {
    match (nav.rack_id(), nav.box_id()) {
        (None, _) => "Shelf".to_string(),
        (Some(rack), None) => rack.to_string(),
        (Some(rack), Some(box_id)) => format!("{} › BOX #{}", rack, box_id),
    }
}

/// Truncates (with `…`) or right-pads `s` to exactly `width` columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackz::model::FiledDocument;

    fn entry(rack: &str, box_id: u32, position: usize, name: &str) -> DocumentEntry {
        DocumentEntry {
            rack_id: rack.to_string(),
            box_id,
            position,
            document: FiledDocument::new("2024-05-05", "N-7", name, "Archive"),
        }
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_to_width("Ada", 10), "Ada");
    }

    #[test]
    fn truncate_marks_cut_strings() {
        let cut = truncate_to_width("Bartholomew Featherstonehaugh", 10);
        assert_eq!(cut, "Bartholom…");
        assert_eq!(cut.width(), 10);
    }

    #[test]
    fn truncate_counts_wide_characters() {
        let cut = truncate_to_width("山田太郎さん", 7);
        assert!(cut.width() <= 7);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad_to_width("ab", 4).width(), 4);
        assert_eq!(pad_to_width("abcdefgh", 4).width(), 4);
    }

    #[test]
    fn search_sentinels() {
        assert!(render_search(&SearchOutcome::Prompt).contains("Enter search terms..."));
        assert!(render_search(&SearchOutcome::NoRecords).contains("No records found."));
    }

    #[test]
    fn documents_show_location_when_asked() {
        let rows = vec![entry("SSS-RACK-4", 2, 1, "Grace Hopper")];
        assert!(render_documents(&rows, true).contains("SSS-RACK-4"));
        assert!(!render_documents(&rows, false).contains("SSS-RACK-4"));
        assert!(render_documents(&rows, false).contains("Grace Hopper"));
    }

    #[test]
    fn location_breadcrumb() {
        let mut nav = NavigationContext::new();
        assert_eq!(render_location(&nav), "Shelf");
        nav.open_box("SSS-RACK-2", 3);
        assert_eq!(render_location(&nav), "SSS-RACK-2 › BOX #3");
    }

    #[test]
    fn empty_shelf_hint() {
        assert!(render_racks(&[], &NavigationContext::new()).contains("No racks yet"));
    }
}
