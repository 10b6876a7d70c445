#![doc = r#"
PIXTWEAK: upload an image, adjust it, download the result.

This crate provides a small, typed filter pipeline (brightness/contrast,
grayscale blend, quarter-turn rotation, horizontal flip) on top of the
`image` crate, plus the pieces needed to run it as a web application: form
parameter parsing, decoding/encoding, an upload store and an HTTP front end.

The pipeline
------------
One fixed sequence of optional adjustments, applied once per call:

1. brightness/contrast: `clamp(round(v * contrast + brightness))` per channel
2. grayscale blend towards the luma image (`grayscale` percent)
3. clockwise rotation by 0, 90, 180 or 270 degrees
4. horizontal flip

```rust
use image::{Rgb, RgbImage};
use pixtweak::{apply, FilterParams};

let red = RgbImage::from_pixel(4, 2, Rgb([255, 0, 0]));
let params = FilterParams { grayscale: 100, rotate: 90, ..Default::default() };

let out = apply(&red, &params).unwrap();
assert_eq!(out.dimensions(), (2, 4));
assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
```

Parsing request parameters
--------------------------
The pipeline never sees raw strings. Form fields are turned into
`FilterParams` first, and out-of-domain values are rejected rather than
coerced:

```rust
use pixtweak::{FilterError, FilterParams};

let params = FilterParams::from_form([("brightness", "40"), ("flip", "on")]).unwrap();
assert_eq!(params.brightness, 40);
assert!(params.flip);

let err = FilterParams::from_form([("rotate", "45")]).unwrap_err();
assert!(matches!(err, FilterError::Validation { field: "rotate", .. }));
```

Edit a file
-----------
```rust,no_run
use std::path::Path;
use pixtweak::{api::edit_file_to_path, FilterParams, OutputFormat};

fn main() -> pixtweak::Result<()> {
    let params = FilterParams { contrast: 1.3, rotate: 180, ..Default::default() };
    edit_file_to_path(
        Path::new("in.jpg"),
        Path::new("out.png"),
        &params,
        Some(OutputFormat::Png),
        95,
    )
}
```

Error handling
--------------
The pipeline returns `FilterError` (`Validation` or `Processing`). All other
public functions return `pixtweak::Result<T>`; match on `pixtweak::Error` to
handle specific cases.

Feature flags
-------------
- `server` (default): the `tiny_http` web front end in [`server`].
- `full`: everything.

Useful modules
--------------
- [`api`]: decode → pipeline → encode in one call.
- [`core`]: `FilterParams` and the processing pipeline.
- [`io`]: decoding, PNG/JPEG writers, upload storage.
- [`config`]: `ServerConfig`.
- [`error`]: `FilterError`, crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// HTTP front end (only available with server feature)
#[cfg(feature = "server")]
pub mod server;

// Curated public API surface
// Types
pub use crate::config::ServerConfig;
pub use crate::core::params::{ClientOptions, FilterParams};
pub use crate::error::{Error, FilterError, Result};
pub use crate::types::{OutputFormat, Rotation};

// Pipeline
pub use crate::core::processing::pipeline::{apply, raster_from_raw};

// I/O helpers
pub use crate::io::decode::{DecodedImage, decode_bytes, decode_file};
pub use crate::io::storage::{UploadStore, sanitize_filename};
pub use crate::io::writers::{encode_image, write_image};

// High-level API re-exports
pub use crate::api::{EditedImage, apply_filters, edit_bytes, edit_file_to_path};
