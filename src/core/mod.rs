//! Core building blocks: the typed filter parameters and the processing
//! pipeline that applies them. The high-level `api` module and the server
//! wrap these with decoding, encoding and storage.
pub mod params;
pub mod processing;
