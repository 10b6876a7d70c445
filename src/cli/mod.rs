//! Command Line Interface (CLI) layer for PIXTWEAK.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for one-shot file edits and the
//! web server. It wires user-provided options to the library API.
//!
//! If you are embedding PIXTWEAK into another application, prefer using
//! the high-level `pixtweak::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
