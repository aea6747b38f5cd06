mod encode;
mod extension;
mod feature;
mod shape;
mod value;

pub use self::encode::{encode_list_of_images, image_to_bytes};
pub use self::extension::ImageType;
pub use self::feature::{ImageFeature, ImageFeatureError};
pub use self::shape::{StorageShape, UnknownStorageShape};
pub use self::value::ImageValue;
