use serde::{Deserialize, Serialize};

/// Prefix shared by every generated rack identifier (`SSS-RACK-<n>`).
pub const RACK_PREFIX: &str = "SSS-RACK";

/// How many boxes fit on one rack.
pub const MAX_BOXES: usize = 15;

/// How many documents fit in one box.
pub const MAX_FILES_PER_BOX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiledDocument {
    #[serde(default)]
    pub date: String,
    pub file_number: String,
    pub full_name: String,
    #[serde(default)]
    pub label: String,
}

impl FiledDocument {
    pub fn new(
        date: impl Into<String>,
        file_number: impl Into<String>,
        full_name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            file_number: file_number.into(),
            full_name: full_name.into(),
            label: label.into(),
        }
    }
}

/// A numbered box on a rack. Named `FileBox` to stay clear of `std::boxed::Box`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBox {
    pub id: u32,
    #[serde(default)]
    pub files: Vec<FiledDocument>,
}

impl FileBox {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            files: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.files.len() >= MAX_FILES_PER_BOX
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    pub id: String,
    #[serde(default)]
    pub boxes: Vec<FileBox>,
}

impl Rack {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            boxes: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.boxes.len() >= MAX_BOXES
    }

    /// Trailing digit run of the identifier, `0` when there is none.
    ///
    /// Runs too long for a `u64` read as `u64::MAX`.
    pub fn number(&self) -> u64 {
        trailing_number(&self.id)
    }

    pub fn find_box(&self, box_id: u32) -> Option<&FileBox> {
        self.boxes.iter().find(|b| b.id == box_id)
    }

    pub fn find_box_mut(&mut self, box_id: u32) -> Option<&mut FileBox> {
        self.boxes.iter_mut().find(|b| b.id == box_id)
    }

    /// Next box id: one past the highest id on the rack.
    ///
    /// Matches `boxes.len() + 1` until a box is removed; after that it keeps
    /// live boxes from sharing an id. `None` once the highest id is `u32::MAX`.
    pub fn next_box_id(&self) -> Option<u32> {
        self.boxes
            .iter()
            .map(|b| b.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    pub fn document_count(&self) -> usize {
        self.boxes.iter().map(|b| b.files.len()).sum()
    }
}

/// The whole inventory: racks in display order.
///
/// Serializes transparently as the snapshot's top-level JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    pub racks: Vec<Rack>,
}

impl Inventory {
    pub fn new(racks: Vec<Rack>) -> Self {
        Self { racks }
    }

    pub fn is_empty(&self) -> bool {
        self.racks.is_empty()
    }

    pub fn find_rack(&self, rack_id: &str) -> Option<&Rack> {
        self.racks.iter().find(|r| r.id == rack_id)
    }

    pub fn find_rack_mut(&mut self, rack_id: &str) -> Option<&mut Rack> {
        self.racks.iter_mut().find(|r| r.id == rack_id)
    }

    pub fn rack_position(&self, rack_id: &str) -> Option<usize> {
        self.racks.iter().position(|r| r.id == rack_id)
    }

    /// Identifier the next created rack receives, `None` once the highest
    /// suffix leaves no room above it.
    pub fn next_rack_id(&self) -> Option<String> {
        let next = self
            .racks
            .iter()
            .map(Rack::number)
            .max()
            .unwrap_or(0)
            .checked_add(1)?;
        Some(format!("{}-{}", RACK_PREFIX, next))
    }
}

fn trailing_number(id: &str) -> u64 {
    let digits_start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    match digits_start {
        Some(start) => id[start..].parse().unwrap_or(u64::MAX),
        None => 0,
    }
}
