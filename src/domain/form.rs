//! Raw declaration form input
//!
//! The form holds the unvalidated field values exactly as the user entered
//! them, plus the attached files. Validation turns it into a
//! [`SubmissionPayload`](super::payload::SubmissionPayload); a successful
//! submit resets it.

use std::path::{Path, PathBuf};

/// Where an attachment's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A file on disk, read when the payload is encoded
    Path(PathBuf),
    /// Bytes already in memory
    Memory(Vec<u8>),
}

/// A file attached to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    /// Display name of the file
    pub name: String,

    /// Media type declared by the caller, if any
    pub declared_type: Option<String>,

    /// Size in bytes as known before reading
    pub size: u64,

    /// Content location
    pub source: FileSource,
}

impl AttachedFile {
    /// Attaches a file from disk
    ///
    /// Only the metadata is read here; the content is read during encoding.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            declared_type: None,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Attaches in-memory bytes
    pub fn in_memory(name: impl Into<String>, declared_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.map(str::to_string),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Overrides the declared media type
    pub fn with_declared_type(mut self, media_type: impl Into<String>) -> Self {
        self.declared_type = Some(media_type.into());
        self
    }

    /// Reads the full content
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// The declaration form as entered by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationForm {
    pub tracking_number: String,
    pub phone: String,
    pub quantity: String,
    pub price: String,
    pub description: String,
    pub collection_point: String,
    pub category: String,
    pub files: Vec<AttachedFile>,
}

impl DeclarationForm {
    /// Clears every field and attachment
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when nothing has been entered
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}
