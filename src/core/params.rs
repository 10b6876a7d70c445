use serde::Deserialize;

use crate::error::FilterError;
use crate::types::Rotation;

pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<i32> = -255..=255;
pub const GRAYSCALE_RANGE: std::ops::RangeInclusive<i32> = 0..=100;

/// Adjustments applied by the filter pipeline, already converted from
/// whatever the request carried into typed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Additive per-channel offset
    pub brightness: i32,
    /// Per-channel multiplier; 1.0 leaves pixels untouched
    pub contrast: f32,
    /// Blend percentage towards the desaturated image
    pub grayscale: i32,
    /// Clockwise rotation in degrees
    pub rotate: i32,
    /// Mirror left-right after rotation
    pub flip: bool,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 1.0,
            grayscale: 0,
            rotate: 0,
            flip: false,
        }
    }
}

impl FilterParams {
    /// Check every field against its domain. Nothing is clamped or coerced here.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !BRIGHTNESS_RANGE.contains(&self.brightness) {
            return Err(FilterError::validation(
                "brightness",
                self.brightness,
                "must be within -255..=255",
            ));
        }
        if !self.contrast.is_finite() || self.contrast < 0.0 {
            return Err(FilterError::validation(
                "contrast",
                self.contrast,
                "must be a finite, non-negative number",
            ));
        }
        if !GRAYSCALE_RANGE.contains(&self.grayscale) {
            return Err(FilterError::validation(
                "grayscale",
                self.grayscale,
                "must be within 0..=100",
            ));
        }
        self.rotation()?;
        Ok(())
    }

    pub fn rotation(&self) -> Result<Rotation, FilterError> {
        Rotation::from_degrees(self.rotate)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Build parameters from HTML form fields.
    ///
    /// Missing or blank fields keep their defaults. Later duplicates win.
    /// `flip` follows checkbox semantics: a bare `on`/`true`/`1`/`yes` enables it.
    pub fn from_form<'a, I>(fields: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (name, raw) in fields {
            let value = raw.trim();
            match name {
                "brightness" if !value.is_empty() => {
                    params.brightness = parse_int("brightness", value)?;
                }
                "contrast" if !value.is_empty() => {
                    params.contrast = value.parse::<f32>().map_err(|_| {
                        FilterError::validation("contrast", value, "not a number")
                    })?;
                }
                "grayscale" if !value.is_empty() => {
                    params.grayscale = parse_int("grayscale", value)?;
                }
                "rotate" if !value.is_empty() => {
                    params.rotate = parse_int("rotate", value)?;
                }
                "flip" => params.flip = parse_flag("flip", value)?,
                _ => {}
            }
        }
        params.validate()?;
        Ok(params)
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i32, FilterError> {
    value
        .parse::<i32>()
        .map_err(|_| FilterError::validation(field, value, "not an integer"))
}

fn parse_flag(field: &'static str, value: &str) -> Result<bool, FilterError> {
    match value.to_ascii_lowercase().as_str() {
        // A checkbox without an explicit value is still "checked"
        "" | "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        _ => Err(FilterError::validation(field, value, "not a boolean")),
    }
}

/// A JSON value the browser may send either as a number or as the raw
/// string of a slider's `value`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn to_f64(&self, field: &'static str) -> Result<f64, FilterError> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FilterError::validation(field, s, "not a number"))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FilterError::validation(field, value, "not a finite number"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

/// The `options` object posted by the browser script to `/api/edit`.
///
/// Brightness and contrast are slider percentages where 100 means no change;
/// `rotate` accumulates 90° per click and may exceed 360.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub brightness: Option<Numeric>,
    pub contrast: Option<Numeric>,
    pub grayscale: Option<Numeric>,
    pub rotate: Option<Numeric>,
    pub flip: Option<Flag>,
}

impl ClientOptions {
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        serde_json::from_str(json)
            .map_err(|_| FilterError::validation("options", json, "not a valid options object"))
    }

    pub fn into_params(self) -> Result<FilterParams, FilterError> {
        let mut params = FilterParams::default();

        if let Some(b) = &self.brightness {
            let percent = non_negative("brightness", b.to_f64("brightness")?)?;
            let offset = ((percent - 100.0) * 255.0 / 100.0).round();
            params.brightness = offset.clamp(-255.0, 255.0) as i32;
        }
        if let Some(c) = &self.contrast {
            let percent = non_negative("contrast", c.to_f64("contrast")?)?;
            params.contrast = (percent / 100.0) as f32;
        }
        if let Some(g) = &self.grayscale {
            let percent = g.to_f64("grayscale")?;
            if !(0.0..=100.0).contains(&percent) {
                return Err(FilterError::validation(
                    "grayscale",
                    percent,
                    "must be within 0..=100",
                ));
            }
            params.grayscale = percent.round() as i32;
        }
        if let Some(r) = &self.rotate {
            let degrees = r.to_f64("rotate")?;
            if degrees.fract() != 0.0 || degrees.abs() > i32::MAX as f64 {
                return Err(FilterError::validation(
                    "rotate",
                    degrees,
                    "must be a multiple of 90",
                ));
            }
            let degrees = degrees as i64;
            if degrees % 90 != 0 {
                return Err(FilterError::validation(
                    "rotate",
                    degrees,
                    "must be a multiple of 90",
                ));
            }
            params.rotate = degrees.rem_euclid(360) as i32;
        }
        if let Some(flag) = &self.flip {
            params.flip = match flag {
                Flag::Bool(b) => *b,
                Flag::Text(s) => parse_flag("flip", s.trim())?,
            };
        }

        params.validate()?;
        Ok(params)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, FilterError> {
    if value < 0.0 {
        Err(FilterError::validation(field, value, "must not be negative"))
    } else {
        Ok(value)
    }
}
