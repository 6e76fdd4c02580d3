// Reifier - Kotlin reified type-parameter extensions for Gradle API archives

// Class-file reading
pub mod classfile;
pub mod signature;

// Extension generation
pub mod codegen;

// Common modules
pub mod config;
pub mod error;
pub mod log;
pub mod task_container;
pub mod tooling;

#[cfg(test)]
mod fixtures;

// Re-export commonly used items for convenience
pub use codegen::{ReifiedTypeParametersExtensionFunction, TypeParameter};
pub use config::ReifierConfig;
pub use error::{ReifierError, Result};
pub use tooling::{ExtensionsGenerator, GenerationReport, generate, generate_with_config};
