use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use pixtweak::types::OutputFormat;

#[derive(Parser)]
#[command(name = "pixtweak", version, about = "PIXTWEAK image adjustment CLI and web front end")]
pub struct CliArgs {
    /// Enable logging (filter with RUST_LOG, default "info")
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the upload/edit/download web front end
    #[cfg(feature = "server")]
    Serve(ServeArgs),

    /// Apply adjustments to a single image file
    Apply(ApplyArgs),
}

#[cfg(feature = "server")]
#[derive(Args)]
pub struct ServeArgs {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interface to listen on
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on (the next free port is tried when taken)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding uploaded and edited images
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Largest accepted request body in bytes
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Request worker threads
    #[arg(long)]
    pub workers: Option<usize>,

    /// Prefix stored uploads with a timestamp instead of overwriting
    #[arg(long, default_value_t = false)]
    pub unique_names: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Input image file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output image file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Additive brightness offset (-255..=255)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub brightness: i32,

    /// Contrast multiplier (1.0 = unchanged)
    #[arg(long, default_value_t = 1.0)]
    pub contrast: f32,

    /// Grayscale blend percentage (0..=100)
    #[arg(long, default_value_t = 0)]
    pub grayscale: i32,

    /// Clockwise rotation in degrees (0, 90, 180 or 270)
    #[arg(long, default_value_t = 0)]
    pub rotate: i32,

    /// Mirror horizontally after rotation
    #[arg(long, default_value_t = false)]
    pub flip: bool,

    /// Output format (png or jpeg); inferred from the output extension when omitted
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// JPEG quality (1..=100)
    #[arg(long, default_value_t = 95)]
    pub quality: u8,
}
