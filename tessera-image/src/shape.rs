use std::fmt::{Display, Formatter};
use std::str::FromStr;

use arrow_schema::{DataType, Field, Fields};
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("Unknown storage shape: {0:?}")]
/// The given name is not one of `string`, `bytes` or `struct`.
pub struct UnknownStorageShape(pub String);

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
/// The physical representation an image column stores its values as.
///
/// This is the on-the-wire shape only. The logical type of the column
/// stays `Image` regardless of which shape the observed data settled on,
/// see [ImageType](crate::ImageType).
pub enum StorageShape {
    #[default]
    #[serde(rename = "string")]
    /// Values are UTF-8 paths pointing at the image resource.
    StringPath,
    #[serde(rename = "bytes")]
    /// Values are the raw encoded image bytes.
    RawBytes,
    #[serde(rename = "struct")]
    /// Values are `{path, bytes}` records with both fields nullable.
    PathBytesStruct,
}

impl StorageShape {
    /// Returns the physical arrow type matching this shape.
    ///
    /// The mapping is deterministic, two calls with the same shape
    /// produce structurally equal types.
    pub fn storage_type(&self) -> DataType {
        match self {
            Self::StringPath => DataType::Utf8,
            Self::RawBytes => DataType::Binary,
            Self::PathBytesStruct => DataType::Struct(Fields::from(vec![
                Field::new("path", DataType::Utf8, true),
                Field::new("bytes", DataType::Binary, true),
            ])),
        }
    }

    /// Returns the wire name of the shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StringPath => "string",
            Self::RawBytes => "bytes",
            Self::PathBytesStruct => "struct",
        }
    }
}

impl Display for StorageShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageShape {
    type Err = UnknownStorageShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::StringPath),
            "bytes" => Ok(Self::RawBytes),
            "struct" => Ok(Self::PathBytesStruct),
            other => Err(UnknownStorageShape(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(StorageShape::StringPath, "string")]
    #[case(StorageShape::RawBytes, "bytes")]
    #[case(StorageShape::PathBytesStruct, "struct")]
    fn test_wire_name_round_trip(#[case] shape: StorageShape, #[case] name: &str) {
        assert_eq!(shape.as_str(), name);
        let parsed: StorageShape = name.parse().expect("Parse wire name");
        assert_eq!(parsed, shape);
    }

    #[test]
    fn test_unknown_wire_name() {
        let result = StorageShape::from_str("binary");
        assert!(result.is_err());
    }

    #[rstest::rstest]
    #[case(StorageShape::StringPath)]
    #[case(StorageShape::RawBytes)]
    #[case(StorageShape::PathBytesStruct)]
    fn test_storage_type_is_pure(#[case] shape: StorageShape) {
        assert_eq!(shape.storage_type(), shape.storage_type());
    }

    #[test]
    fn test_struct_shape_fields() {
        let DataType::Struct(fields) = StorageShape::PathBytesStruct.storage_type() else {
            panic!("Struct shape should map to a struct type");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name(), "path");
        assert_eq!(fields[0].data_type(), &DataType::Utf8);
        assert!(fields[0].is_nullable());
        assert_eq!(fields[1].name(), "bytes");
        assert_eq!(fields[1].data_type(), &DataType::Binary);
        assert!(fields[1].is_nullable());
    }
}
