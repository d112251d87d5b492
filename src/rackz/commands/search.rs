use crate::commands::{CmdResult, DocumentEntry};
use crate::error::Result;
use crate::model::{FileBox, FiledDocument, Inventory};

/// Result of a search over all filed documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was empty: ask for search terms.
    Prompt,
    /// Nothing matched.
    NoRecords,
    /// Matches in rack, box, document order.
    Matches(Vec<DocumentEntry>),
}

fn matches(file_box: &FileBox, doc: &FiledDocument, query: &str) -> bool {
    file_box.id.to_string().contains(query)
        || doc.file_number.to_lowercase().contains(query)
        || doc.full_name.to_lowercase().contains(query)
        || doc.label.to_lowercase().contains(query)
}

/// Case-insensitive substring search over box id, file number, full name and label.
pub fn search(inventory: &Inventory, query: &str) -> SearchOutcome {
    if query.is_empty() {
        return SearchOutcome::Prompt;
    }
    let query = query.to_lowercase();

    let mut hits = Vec::new();
    for rack in &inventory.racks {
        for file_box in &rack.boxes {
            for (i, doc) in file_box.files.iter().enumerate() {
                if matches(file_box, doc, &query) {
                    hits.push(DocumentEntry {
                        rack_id: rack.id.clone(),
                        box_id: file_box.id,
                        position: i + 1,
                        document: doc.clone(),
                    });
                }
            }
        }
    }

    if hits.is_empty() {
        SearchOutcome::NoRecords
    } else {
        SearchOutcome::Matches(hits)
    }
}

pub fn run(inventory: &Inventory, query: &str) -> Result<CmdResult> {
    Ok(CmdResult::default().with_search(search(inventory, query)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::InventoryFixture;

    fn sample() -> Inventory {
        InventoryFixture::new()
            .with_document(
                "SSS-RACK-1",
                1,
                FiledDocument::new("2024-01-01", "A-100", "Maria Lopez", "Payroll"),
            )
            .with_document(
                "SSS-RACK-1",
                2,
                FiledDocument::new("2024-01-02", "A-200", "John Smith", "legal"),
            )
            .with_document(
                "SSS-RACK-2",
                1,
                FiledDocument::new("2024-01-03", "B-300", "maria keller", ""),
            )
            .build()
    }

    fn numbers(outcome: &SearchOutcome) -> Vec<&str> {
        match outcome {
            SearchOutcome::Matches(hits) => hits
                .iter()
                .map(|h| h.document.file_number.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn empty_query_prompts() {
        assert_eq!(search(&sample(), ""), SearchOutcome::Prompt);
    }

    #[test]
    fn no_match_reports_no_records() {
        assert_eq!(search(&sample(), "zebra"), SearchOutcome::NoRecords);
        assert_eq!(search(&Inventory::default(), "x"), SearchOutcome::NoRecords);
    }

    #[test]
    fn matches_case_insensitively_in_traversal_order() {
        let outcome = search(&sample(), "MARIA");
        assert_eq!(numbers(&outcome), ["A-100", "B-300"]);
    }

    #[test]
    fn matches_label_and_file_number() {
        assert_eq!(numbers(&search(&sample(), "payr")), ["A-100"]);
        assert_eq!(numbers(&search(&sample(), "a-2")), ["A-200"]);
    }

    #[test]
    fn matches_box_id() {
        let outcome = search(&sample(), "2");
        // box 2 matches on id; A-200 also contains "2"
        assert_eq!(numbers(&outcome), ["A-200"]);

        let outcome = search(&sample(), "1");
        assert_eq!(numbers(&outcome), ["A-100", "B-300"]);
    }

    #[test]
    fn hits_carry_location() {
        let SearchOutcome::Matches(hits) = search(&sample(), "keller") else {
            panic!("expected matches");
        };
        assert_eq!(hits[0].rack_id, "SSS-RACK-2");
        assert_eq!(hits[0].box_id, 1);
        assert_eq!(hits[0].position, 1);
    }
}
