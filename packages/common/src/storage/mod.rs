mod error;
mod name;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use name::{FilenameError, image_extension, validate_flat_filename};
pub use traits::{BoxReader, ImageStore};
