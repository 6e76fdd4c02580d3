//! Reified type-parameter extension generation.
//!
//! The pipeline reads archives, keeps the candidate class entries, picks the
//! methods that take a single `java.lang.Class` token and renders one Kotlin
//! `inline fun <reified T>` wrapper for each of them:
//!
//! ```no_run
//! use reifier_core::codegen::{DEFAULT_PACKAGE, write_reified_type_parameters_extensions_to};
//! use reifier_core::config::ScanConfig;
//! use std::path::Path;
//!
//! let summary = write_reified_type_parameters_extensions_to(
//!     Path::new("build/ReifiedTypeParametersExtensions.kt"),
//!     ["lib/gradle-core-api.jar"],
//!     &ScanConfig::default(),
//!     DEFAULT_PACKAGE,
//! )?;
//! println!("{} declarations", summary.declarations);
//! # Ok::<(), reifier_core::ReifierError>(())
//! ```

mod archive;
mod model;
mod scanner;
mod writer;

pub use archive::{ReifiedExtensions, gradle_jars, reified_extensions_from, select_classes_from};
pub use model::{ReifiedTypeParametersExtensionFunction, TypeParameter};
pub use scanner::{ClassRecord, select_functions_from};
pub use writer::{
    DEFAULT_PACKAGE, WriteSummary, file_header, reified_type_parameters_extension_declarations_for,
    write_declarations, write_reified_type_parameters_extensions_to,
};
