//! Domain model for a single CD entry. Records are plain data holders; the
//! ordering and identifier rules live in [`crate::inventory`].

use std::fmt;

/// Placeholder text used when a title or artist could not be read.
pub const PLACEHOLDER_TEXT: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One CD in the collection.
pub struct Record {
    /// Positive identifier, unique within one inventory and never reused
    /// while the inventory keeps its last entry.
    pub id: u32,
    /// Title as typed by the user. May be empty.
    pub title: String,
    /// Artist as typed by the user. May be empty.
    pub artist: String,
}

impl Record {
    pub fn new(id: u32, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Record with `id = 0` and `NA` fields, used when input could not be
    /// turned into a real entry.
    pub fn placeholder() -> Self {
        Self::new(0, PLACEHOLDER_TEXT, PLACEHOLDER_TEXT)
    }

    /// Compose an `ID  Title  Artist` row padded to the inventory column
    /// widths.
    pub fn table_row(&self) -> String {
        format!("{:<10}{:<25}{:<25}", self.id, self.title, self.artist)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.artist.trim().is_empty() {
            write!(f, "#{} {}", self.id, self.title)
        } else {
            write!(f, "#{} {} - {}", self.id, self.title, self.artist)
        }
    }
}
