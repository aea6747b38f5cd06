//! The image feature descriptor.
//!
//! An [ImageFeature] sits in a column definition and converts between
//! application level image values and the physical column values, while
//! tracking which [StorageShape] the observed data settled on.

use arrow_schema::Field;
use image::error::ImageFormatHint;
use image::{DynamicImage, ImageReader};
use serde_derive::{Deserialize, Serialize};
use tessera_fetch::{FetchError, FetchReader, Fetcher};
use tracing::{instrument, trace};

use crate::extension::ImageType;
use crate::shape::StorageShape;
use crate::value::ImageValue;

#[derive(Debug, thiserror::Error)]
/// An error that can occur while encoding or decoding image values.
pub enum ImageFeatureError {
    #[error("Codec unavailable: {0}, enable the matching `image` crate feature to handle this format")]
    /// The codec cannot handle the image format, usually because
    /// support for it was not compiled in.
    CodecUnavailable(image::error::UnsupportedError),
    #[error("Resource unreadable: {0}")]
    /// The path based resource could not be opened or read.
    ///
    /// Surfaced verbatim from the fetch layer, never retried here.
    ResourceUnreadable(#[from] FetchError),
    #[error("Malformed image: {0}")]
    /// The bytes do not parse as a supported image format.
    MalformedImage(image::ImageError),
    #[error("Image encode failed: {0}")]
    /// The codec failed to write the image out as PNG bytes.
    EncodeFailed(image::ImageError),
    #[error("Record value has neither a path nor bytes to decode")]
    /// A record value with both fields absent cannot be decoded.
    EmptyRecord,
    #[error("Inconsistent storage shape within column: expected {expected}, found {found}")]
    /// A batch of values mixes storage shapes, which would leave the
    /// column without a single physical representation.
    InconsistentShape {
        expected: StorageShape,
        found: StorageShape,
    },
}

impl ImageFeatureError {
    pub(crate) fn from_decode(error: image::ImageError) -> Self {
        match error {
            // A recognized format the codec cannot handle is a missing
            // capability, content the codec cannot even identify is not.
            image::ImageError::Unsupported(e)
                if !matches!(e.format_hint(), ImageFormatHint::Unknown) =>
            {
                Self::CodecUnavailable(e)
            },
            other => Self::MalformedImage(other),
        }
    }

    pub(crate) fn from_encode(error: image::ImageError) -> Self {
        match error {
            image::ImageError::Unsupported(e) => Self::CodecUnavailable(e),
            other => Self::EncodeFailed(other),
        }
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
/// The logical type of a column holding images.
///
/// The descriptor accepts values as paths, raw bytes or `{path, bytes}`
/// records and tracks which [StorageShape] the column stores. The shape
/// follows the values seen by [ImageFeature::encode], so representative
/// values must be encoded before the physical column is built from
/// [ImageFeature::storage_field].
///
/// The tracked shape reflects the *last* encoded value. Callers feeding
/// a descriptor from multiple threads, or with values of mixed shapes,
/// should pre-declare the shape with [ImageFeature::encode_batch] or
/// [ImageFeature::infer_shape] instead of relying on the per value
/// updates.
pub struct ImageFeature {
    #[serde(rename = "storage", default)]
    shape: StorageShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// An optional column identifier, carried for schema bookkeeping.
    ///
    /// Has no effect on encoding or decoding.
    pub id: Option<String>,
}

impl ImageFeature {
    /// Creates a new [ImageFeature] with the default [StorageShape].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [ImageFeature] with a pre-declared [StorageShape].
    pub fn with_shape(shape: StorageShape) -> Self {
        Self { shape, id: None }
    }

    /// Returns the [StorageShape] currently in use.
    pub fn shape(&self) -> StorageShape {
        self.shape
    }

    /// Encodes one application value into its physical column value.
    ///
    /// This is a pure shape classification and passthrough step: the
    /// value is returned unchanged and the resource behind it is never
    /// opened or validated. Byte and record values update the tracked
    /// shape, plain paths leave it untouched.
    ///
    /// In-memory images have no implicit encoding here, convert them
    /// up front with [image_to_bytes](crate::image_to_bytes).
    pub fn encode(&mut self, value: ImageValue) -> ImageValue {
        match &value {
            ImageValue::Bytes(_) => self.shape = StorageShape::RawBytes,
            ImageValue::Record { .. } => self.shape = StorageShape::PathBytesStruct,
            ImageValue::Path(_) => (),
        }
        value
    }

    /// Classifies a representative batch of values as a single
    /// [StorageShape].
    ///
    /// A batch mixing shapes is an error rather than a merge, the
    /// column needs one physical representation. An empty batch yields
    /// the default shape.
    pub fn infer_shape<'a, I>(values: I) -> Result<StorageShape, ImageFeatureError>
    where
        I: IntoIterator<Item = &'a ImageValue>,
    {
        let mut inferred = None;
        for value in values {
            let shape = value.shape();
            match inferred {
                None => inferred = Some(shape),
                Some(expected) if expected != shape => {
                    return Err(ImageFeatureError::InconsistentShape {
                        expected,
                        found: shape,
                    })
                },
                Some(_) => (),
            }
        }
        Ok(inferred.unwrap_or_default())
    }

    /// Encodes a batch of values after fixing the shape up front.
    ///
    /// The shape is inferred once from the whole batch and frozen
    /// before any value passes through, so a mixed batch fails as a
    /// whole without touching the descriptor. An empty batch is a
    /// no-op.
    pub fn encode_batch(
        &mut self,
        values: Vec<ImageValue>,
    ) -> Result<Vec<ImageValue>, ImageFeatureError> {
        if values.is_empty() {
            return Ok(values);
        }

        self.shape = Self::infer_shape(values.iter())?;
        Ok(values)
    }

    #[instrument(skip_all)]
    /// Decodes one physical column value into an in-memory image.
    ///
    /// Paths are resolved through the given [Fetcher], raw bytes are
    /// read directly. For record values the inline bytes are
    /// authoritative, the path is only used when no bytes are present.
    /// Acquired streams are released once the image is materialized,
    /// on failure paths included.
    ///
    /// The tracked shape is not consulted or modified by decoding.
    pub fn decode(
        &self,
        value: &ImageValue,
        fetcher: &Fetcher,
    ) -> Result<DynamicImage, ImageFeatureError> {
        match value {
            ImageValue::Path(path) => {
                trace!(path = %path, "Decoding image from path");
                let reader = fetcher.open(path)?;
                open_image(reader)
            },
            ImageValue::Bytes(bytes) => open_image(FetchReader::memory(bytes.clone())),
            ImageValue::Record {
                bytes: Some(bytes), ..
            } => open_image(FetchReader::memory(bytes.clone())),
            ImageValue::Record {
                path: Some(path),
                bytes: None,
            } => {
                trace!(path = %path, "Record has no inline bytes, decoding from path");
                let reader = fetcher.open(path)?;
                open_image(reader)
            },
            ImageValue::Record {
                path: None,
                bytes: None,
            } => Err(ImageFeatureError::EmptyRecord),
        }
    }

    /// Returns the [ImageType] wrapper for the current shape.
    pub fn extension(&self) -> ImageType {
        ImageType::new(self.shape)
    }

    /// Builds the physical [Field] the column is materialized with,
    /// tagged with the `Image` logical type.
    ///
    /// Pure function of the current shape: two calls on descriptors
    /// with equal shapes yield structurally equal fields.
    pub fn storage_field(&self, name: &str) -> Field {
        self.extension().storage_field(name)
    }
}

/// Parses a full image out of the given stream via the codec.
fn open_image(reader: FetchReader) -> Result<DynamicImage, ImageFeatureError> {
    let reader = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(FetchError::from)?;
    reader.decode().map_err(ImageFeatureError::from_decode)
}
