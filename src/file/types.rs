//! Closed classifications for data room files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{DataRoomError, Result};

/// Declared type of a file, derived from its display name's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Xlsx,
    Pptx,
    Txt,
    Other,
}

impl FileType {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Xlsx => "xlsx",
            FileType::Pptx => "pptx",
            FileType::Txt => "txt",
            FileType::Other => "other",
        }
    }

    /// Classify an extension (without the leading dot). Case-insensitive.
    ///
    /// ```
    /// use dataroom::file::FileType;
    ///
    /// assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
    /// assert_eq!(FileType::from_extension("zip"), FileType::Other);
    /// ```
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "xlsx" => FileType::Xlsx,
            "pptx" => FileType::Pptx,
            "txt" => FileType::Txt,
            _ => FileType::Other,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileType {
    type Err = DataRoomError;

    /// Parse a wire name. Unlike `from_extension`, unknown names are rejected.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(FileType::Pdf),
            "docx" => Ok(FileType::Docx),
            "xlsx" => Ok(FileType::Xlsx),
            "pptx" => Ok(FileType::Pptx),
            "txt" => Ok(FileType::Txt),
            "other" => Ok(FileType::Other),
            _ => Err(DataRoomError::InvalidInput(format!("unknown file type: {s}"))),
        }
    }
}

/// Classification tag attached to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Legal,
    Financial,
    Hr,
    Commercial,
    Technical,
    Operational,
    Other,
}

impl FileCategory {
    /// All categories, in declaration order.
    pub const ALL: [FileCategory; 7] = [
        FileCategory::Legal,
        FileCategory::Financial,
        FileCategory::Hr,
        FileCategory::Commercial,
        FileCategory::Technical,
        FileCategory::Operational,
        FileCategory::Other,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Legal => "legal",
            FileCategory::Financial => "financial",
            FileCategory::Hr => "hr",
            FileCategory::Commercial => "commercial",
            FileCategory::Technical => "technical",
            FileCategory::Operational => "operational",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = DataRoomError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        FileCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| DataRoomError::InvalidInput(format!("unknown category: {s}")))
    }
}

/// Parse category tags, keeping first-seen order and dropping repeats.
pub fn parse_categories<S: AsRef<str>>(raw: &[S]) -> Result<Vec<FileCategory>> {
    let mut categories = Vec::with_capacity(raw.len());
    for tag in raw {
        let category: FileCategory = tag.as_ref().parse()?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}
