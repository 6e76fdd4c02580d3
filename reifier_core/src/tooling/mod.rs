//! Entry points for generating the extensions file from a build script or tool.
//!
//! ## Quick Start (in build.rs)
//!
//! ```rust,ignore
//! fn main() {
//!     reifier_core::tooling::generate().expect("Extension generation failed");
//!     println!("cargo:rerun-if-changed=reifier.toml");
//! }
//! ```

mod generator;

pub use generator::*;

use crate::config::ReifierConfig;
use crate::error::Result;

/// Generates the extensions file using configuration from reifier.toml.
///
/// The file is searched for from the current directory upward.
///
/// # Errors
///
/// Returns `ReifierError` if:
/// - Configuration file cannot be found or parsed
/// - An archive cannot be read or holds a malformed class file
/// - The output file cannot be written
pub fn generate() -> Result<GenerationReport> {
    let config = ReifierConfig::new()?;
    ExtensionsGenerator::new(config).generate()
}

/// Generates the extensions file with a custom configuration.
pub fn generate_with_config(config: ReifierConfig) -> Result<GenerationReport> {
    ExtensionsGenerator::new(config).generate()
}
