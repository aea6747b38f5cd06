use bytes::Bytes;

use crate::shape::StorageShape;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single image value as applications hand it to the column.
pub enum ImageValue {
    /// An absolute path or URL of the image resource, random access
    /// to the resource is assumed to be possible.
    Path(String),
    /// The raw encoded image bytes.
    Bytes(Bytes),
    /// An archive style reference: a path relative to the archive plus
    /// optionally the file bytes themselves.
    ///
    /// Useful for archives which only allow sequential access. Both
    /// fields are independently optional, callers may supply one or both.
    Record {
        path: Option<String>,
        bytes: Option<Bytes>,
    },
}

impl ImageValue {
    /// Creates a new record value from its parts.
    pub fn record(path: Option<String>, bytes: Option<Bytes>) -> Self {
        Self::Record { path, bytes }
    }

    /// Returns the [StorageShape] this value is stored as.
    pub fn shape(&self) -> StorageShape {
        match self {
            Self::Path(_) => StorageShape::StringPath,
            Self::Bytes(_) => StorageShape::RawBytes,
            Self::Record { .. } => StorageShape::PathBytesStruct,
        }
    }
}

impl From<String> for ImageValue {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for ImageValue {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<Bytes> for ImageValue {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for ImageValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}
