//! CLI command implementations.
//!
//! - **analyze**: run the full pipeline over a source tree and export
//!   the model
//! - **init**: write a default configuration file
//!
//! Each command takes plain data parsed by the `cli` module and owns
//! its own I/O.

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::init_config;
