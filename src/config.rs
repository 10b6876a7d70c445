//! Server configuration: an explicit value built once at startup and handed
//! to the upload store and the HTTP server. Loaded from an optional JSON file,
//! then overridden by command-line flags.
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::writers::DEFAULT_JPEG_QUALITY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    /// 0 asks the OS for an ephemeral port
    pub port: u16,
    pub upload_dir: PathBuf,
    /// Largest request body accepted, in bytes
    pub max_upload_bytes: usize,
    /// Threads serving requests concurrently
    pub workers: usize,
    /// Prefix stored uploads with a timestamp instead of overwriting same-named files
    pub unique_names: bool,
    pub jpeg_quality: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            upload_dir: PathBuf::from("static/uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            workers: 4,
            unique_names: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ServerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than 0".into()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
