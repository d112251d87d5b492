use crate::config::RackzConfig;
use crate::model::{FileBox, FiledDocument, Rack};
use std::path::PathBuf;

pub mod boxes;
pub mod config;
pub mod documents;
pub mod export;
pub mod helpers;
pub mod import;
pub mod list;
pub mod racks;
pub mod search;
pub mod stats;

pub use search::SearchOutcome;
pub use stats::InventoryStats;

/// Interactive confirmation for destructive operations.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything. For `--yes` and tests.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A document together with where it is filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub rack_id: String,
    pub box_id: u32,
    /// 1-based position inside the box.
    pub position: usize,
    pub document: FiledDocument,
}

/// Input fields for a new document.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub date: String,
    pub file_number: String,
    pub full_name: String,
    pub label: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_racks: Vec<Rack>,
    pub listed_racks: Vec<Rack>,
    /// Boxes of one rack (rack view), paired with their rack id.
    pub listed_boxes: Vec<(String, FileBox)>,
    pub listed_documents: Vec<DocumentEntry>,
    pub search: Option<SearchOutcome>,
    pub stats: Option<InventoryStats>,
    pub exported_to: Option<PathBuf>,
    pub config: Option<RackzConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_racks(mut self, racks: Vec<Rack>) -> Self {
        self.affected_racks = racks;
        self
    }

    pub fn with_listed_racks(mut self, racks: Vec<Rack>) -> Self {
        self.listed_racks = racks;
        self
    }

    pub fn with_listed_boxes(mut self, boxes: Vec<(String, FileBox)>) -> Self {
        self.listed_boxes = boxes;
        self
    }

    pub fn with_listed_documents(mut self, documents: Vec<DocumentEntry>) -> Self {
        self.listed_documents = documents;
        self
    }

    pub fn with_search(mut self, outcome: SearchOutcome) -> Self {
        self.search = Some(outcome);
        self
    }

    pub fn with_stats(mut self, stats: InventoryStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_config(mut self, config: RackzConfig) -> Self {
        self.config = Some(config);
        self
    }
}
