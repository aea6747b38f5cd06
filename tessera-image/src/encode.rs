//! Standalone encode helpers for in-memory images.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat};

use crate::feature::ImageFeatureError;

/// Serializes an in-memory image to lossless PNG bytes.
///
/// For a given pixel content the output is deterministic, modulo
/// whatever metadata the codec itself chooses to embed.
pub fn image_to_bytes(image: &DynamicImage) -> Result<Bytes, ImageFeatureError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(ImageFeatureError::from_encode)?;
    Ok(Bytes::from(buffer.into_inner()))
}

/// Encodes a list of in-memory images to PNG bytes, preserving order.
///
/// Fails as a whole on the first image that cannot be encoded, there
/// is no partial success mode.
pub fn encode_list_of_images(
    images: &[DynamicImage],
) -> Result<Vec<Bytes>, ImageFeatureError> {
    images.iter().map(image_to_bytes).collect()
}
