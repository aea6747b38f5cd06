//! The arrow extension type tagging image columns.
//!
//! The physical type of an image column varies with the data (see
//! [StorageShape]), the logical type does not. The tag and the shape
//! travel as arrow field metadata, which every schema transport
//! preserves, so a field reconstructed on the other side of a process
//! boundary is structurally identical to the original.

use arrow_schema::extension::ExtensionType;
use arrow_schema::{ArrowError, DataType, Field};

use crate::shape::StorageShape;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// The `Image` logical type over an arbitrary [StorageShape].
///
/// The shape is the sole reconstruction parameter: serializing the
/// metadata string and parsing it back yields an identical wrapper.
pub struct ImageType(StorageShape);

impl ImageType {
    /// Creates a new [ImageType] storing values with the given shape.
    pub fn new(shape: StorageShape) -> Self {
        Self(shape)
    }

    /// Returns the [StorageShape] of the wrapped physical type.
    pub fn storage_shape(&self) -> StorageShape {
        self.0
    }

    /// Returns the physical arrow type the column is built with.
    pub fn storage_type(&self) -> DataType {
        self.0.storage_type()
    }

    /// Builds the physical [Field] for the column, tagged with this
    /// extension type.
    pub fn storage_field(&self, name: &str) -> Field {
        Field::new(name, self.0.storage_type(), true).with_extension_type(*self)
    }
}

impl ExtensionType for ImageType {
    const NAME: &'static str = "tessera.image";

    type Metadata = StorageShape;

    fn metadata(&self) -> &Self::Metadata {
        &self.0
    }

    fn serialize_metadata(&self) -> Option<String> {
        Some(self.0.as_str().to_string())
    }

    fn deserialize_metadata(metadata: Option<&str>) -> Result<Self::Metadata, ArrowError> {
        let raw = metadata.ok_or_else(|| {
            ArrowError::InvalidArgumentError(
                "Image extension field is missing its storage shape metadata".to_string(),
            )
        })?;
        raw.parse()
            .map_err(|e| ArrowError::InvalidArgumentError(format!("{e}")))
    }

    fn supports_data_type(&self, data_type: &DataType) -> Result<(), ArrowError> {
        let expected = self.0.storage_type();
        if data_type == &expected {
            Ok(())
        } else {
            Err(ArrowError::InvalidArgumentError(format!(
                "Image storage shape {} expects the physical type {expected}, got {data_type}",
                self.0,
            )))
        }
    }

    fn try_new(data_type: &DataType, metadata: Self::Metadata) -> Result<Self, ArrowError> {
        let slf = Self(metadata);
        slf.supports_data_type(data_type)?;
        Ok(slf)
    }
}

#[cfg(test)]
mod tests {
    use arrow_schema::extension::{EXTENSION_TYPE_METADATA_KEY, EXTENSION_TYPE_NAME_KEY};

    use super::*;

    #[rstest::rstest]
    #[case(StorageShape::StringPath)]
    #[case(StorageShape::RawBytes)]
    #[case(StorageShape::PathBytesStruct)]
    fn test_field_round_trip(#[case] shape: StorageShape) {
        let original = ImageType::new(shape);
        let field = original.storage_field("image");

        assert_eq!(
            field.metadata().get(EXTENSION_TYPE_NAME_KEY),
            Some(&"tessera.image".to_string()),
        );
        assert_eq!(
            field.metadata().get(EXTENSION_TYPE_METADATA_KEY),
            Some(&shape.as_str().to_string()),
        );

        let restored: ImageType = field
            .try_extension_type()
            .expect("Restore extension type from field metadata");
        assert_eq!(restored, original);
        assert_eq!(restored.storage_type(), original.storage_type());
    }

    #[test]
    fn test_reconstruct_from_metadata_alone() {
        let original = ImageType::new(StorageShape::PathBytesStruct);
        let field = original.storage_field("image");

        // Simulates the far side of a process boundary: only the physical
        // type and the metadata string survive the trip.
        let metadata = ImageType::deserialize_metadata(field.extension_type_metadata())
            .expect("Parse shape metadata");
        let restored = ImageType::try_new(field.data_type(), metadata)
            .expect("Rebuild extension type");
        assert_eq!(restored, original);
    }

    #[test]
    fn test_missing_metadata_is_rejected() {
        let result = ImageType::deserialize_metadata(None);
        assert!(result.is_err());

        let result = ImageType::deserialize_metadata(Some("binary"));
        assert!(result.is_err());
    }

    #[test]
    fn test_mismatched_storage_type_is_rejected() {
        let result = ImageType::try_new(&DataType::Utf8, StorageShape::RawBytes);
        assert!(result.is_err());
    }
}
