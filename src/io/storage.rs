use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::types::OutputFormat;

pub const EDITED_PREFIX: &str = "edited_";

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// Non-ASCII text is transliterated, path separators become spaces, runs of
/// whitespace become `_`, anything outside `[A-Za-z0-9_.-]` is dropped and
/// leading/trailing dots and underscores are stripped. Returns `None` when
/// nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let ascii = deunicode::deunicode(name);
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Name under which the edited counterpart of `stored_name` is kept. The
/// extension is replaced when the encoded format doesn't match it.
pub fn edited_name(stored_name: &str, format: OutputFormat) -> String {
    let path = Path::new(stored_name);
    if OutputFormat::from_path(path) == Some(format) {
        return format!("{EDITED_PREFIX}{stored_name}");
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(stored_name);
    format!("{EDITED_PREFIX}{stem}.{}", format.extension())
}

/// Flat directory holding uploaded originals and their edited versions.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    unique_names: bool,
}

impl UploadStore {
    /// Open the store, creating the directory when it doesn't exist yet.
    pub fn open(root: impl Into<PathBuf>, unique_names: bool) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!("Upload store at {:?}", root);
        Ok(Self { root, unique_names })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::open(&config.upload_dir, config.unique_names)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store an upload under its sanitized name (timestamp-prefixed when
    /// unique names are on) and return that name. Existing files are replaced.
    pub fn save_upload(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let sanitized = sanitize_filename(original_name).ok_or_else(|| Error::InvalidFilename {
            name: original_name.to_string(),
        })?;
        let name = if self.unique_names {
            format!(
                "{}_{}",
                chrono::Local::now().format("%Y%m%d%H%M%S%3f"),
                sanitized
            )
        } else {
            sanitized
        };
        self.write(&name, bytes)?;
        Ok(name)
    }

    /// Store the edited version of a previously saved upload.
    pub fn save_edited(&self, stored_name: &str, format: OutputFormat, bytes: &[u8]) -> Result<String> {
        let name = edited_name(stored_name, format);
        self.write(&name, bytes)?;
        Ok(name)
    }

    /// Map a requested name to a file inside the store.
    ///
    /// Names that would change under sanitization (`../x`, `a/b`, ...) are
    /// treated as missing rather than resolved.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        match sanitize_filename(name) {
            Some(clean) if clean == name => {
                let path = self.root.join(&clean);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(Error::NotFound(name.to_string()))
                }
            }
            _ => Err(Error::NotFound(name.to_string())),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(name);
        fs::write(&path, bytes)?;
        info!("Stored {} bytes at {:?}", bytes.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_matches_secure_filename_rules() {
        assert_eq!(sanitize_filename("My cool movie.mov").as_deref(), Some("My_cool_movie.mov"));
        assert_eq!(sanitize_filename("../../../etc/passwd").as_deref(), Some("etc_passwd"));
        assert_eq!(sanitize_filename("..\\windows\\x.png").as_deref(), Some("windows_x.png"));
        assert_eq!(sanitize_filename("  .hidden.jpg").as_deref(), Some("hidden.jpg"));
        assert_eq!(sanitize_filename("café.png").as_deref(), Some("cafe.png"));
        assert_eq!(sanitize_filename("a<b>|c?.png").as_deref(), Some("abc.png"));
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename(""), None);
    }

    #[test]
    fn edited_name_keeps_or_swaps_extension() {
        assert_eq!(edited_name("cat.png", OutputFormat::Png), "edited_cat.png");
        assert_eq!(edited_name("cat.JPG", OutputFormat::Jpeg), "edited_cat.JPG");
        assert_eq!(edited_name("cat.gif", OutputFormat::Png), "edited_cat.png");
        assert_eq!(edited_name("cat", OutputFormat::Jpeg), "edited_cat.jpg");
    }

    #[test]
    fn save_and_resolve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path().join("uploads"), false).unwrap();
        assert!(store.root().is_dir());

        let name = store.save_upload("holiday photo.png", b"original").unwrap();
        assert_eq!(name, "holiday_photo.png");
        let edited = store.save_edited(&name, OutputFormat::Png, b"edited").unwrap();
        assert_eq!(edited, "edited_holiday_photo.png");

        let path = store.resolve(&edited).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"edited");
    }

    #[test]
    fn unique_names_get_a_timestamp_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path(), true).unwrap();
        let name = store.save_upload("x.png", b"data").unwrap();
        assert!(name.ends_with("_x.png"));
        assert!(name.len() > "x.png".len() + 17);
        assert!(store.resolve(&name).is_ok());
    }

    #[test]
    fn resolve_rejects_traversal_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path(), false).unwrap();
        assert!(matches!(store.resolve("../secret.png"), Err(Error::NotFound(_))));
        assert!(matches!(store.resolve("missing.png"), Err(Error::NotFound(_))));
    }

    #[test]
    fn unusable_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path(), false).unwrap();
        assert!(matches!(
            store.save_upload("///", b"x"),
            Err(Error::InvalidFilename { .. })
        ));
    }
}
