//! Shared types and enums used across PIXTWEAK.
//! Includes `Rotation` (quarter-turn rotation parsed from degrees) and
//! `OutputFormat` (the encodings the writers support).
use std::path::Path;

use clap::ValueEnum;

use crate::error::FilterError;

/// Clockwise rotation in whole quarter turns.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Map a degree value onto a rotation. Only the four axis-aligned angles
    /// are accepted; anything else is a validation error, never rounded.
    pub fn from_degrees(degrees: i32) -> Result<Self, FilterError> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Cw90),
            180 => Ok(Rotation::Cw180),
            270 => Ok(Rotation::Cw270),
            other => Err(FilterError::validation(
                "rotate",
                other,
                "must be one of 0, 90, 180, 270",
            )),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OutputFormat {
    Png,
    Jpeg, // Lossy
}

impl OutputFormat {
    /// Infer the format from a file extension (`png`, `jpg`, `jpeg`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    /// Writable counterpart of a decoded format; anything the writers can't
    /// produce falls back to PNG.
    pub fn from_image_format(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => OutputFormat::Jpeg,
            _ => OutputFormat::Png,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_accepts_only_axis_aligned_angles() {
        assert_eq!(Rotation::from_degrees(0), Ok(Rotation::None));
        assert_eq!(Rotation::from_degrees(270), Ok(Rotation::Cw270));
        for bad in [45, -90, 360, 91] {
            assert!(Rotation::from_degrees(bad).unwrap_err().is_validation());
        }
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.PNG")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("x.jpeg")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("x.gif")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }
}
