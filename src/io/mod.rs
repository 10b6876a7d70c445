//! I/O layer around the filter pipeline: `decode` turns uploaded bytes or files
//! into RGB rasters, `writers` encodes results as PNG/JPEG, and `storage`
//! keeps uploads and edited images under sanitized names.
pub mod decode;
pub use decode::{DecodedImage, decode_bytes, decode_file};

pub mod storage;
pub use storage::{UploadStore, sanitize_filename};

pub mod writers;
