//! Extension generation for build-time usage.

use crate::codegen::{
    ReifiedExtensions, ReifiedTypeParametersExtensionFunction, gradle_jars,
    reified_type_parameters_extension_declarations_for, write_reified_type_parameters_extensions_to,
};
use crate::config::ReifierConfig;
use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Report of the generation process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// The path where the file was written.
    pub path: PathBuf,
    /// The number of bytes written.
    pub bytes_written: u64,
    /// Archives on the configured classpath.
    pub archives_considered: usize,
    /// Archives whose name matched the jar prefix.
    pub archives_scanned: usize,
    /// Declarations written to the file.
    pub declarations: usize,
}

/// Generator for the reified type-parameter extensions file.
pub struct ExtensionsGenerator {
    config: ReifierConfig,
}

impl ExtensionsGenerator {
    /// Creates a new ExtensionsGenerator with the given configuration.
    pub fn new(config: ReifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReifierConfig {
        &self.config
    }

    /// Scans the classpath and writes the output file.
    pub fn generate(&self) -> Result<GenerationReport> {
        info!("Starting extension generation");
        let jars = self.config.jar_paths()?;
        let archives_scanned = gradle_jars(&jars, &self.config.scan.jar_prefix).len();
        debug!(
            "Scanning {} of {} archives",
            archives_scanned,
            jars.len()
        );
        if archives_scanned == 0 {
            warn!(
                "No archive name starts with '{}', the output will only hold the header",
                self.config.scan.jar_prefix
            );
        }

        let path = self.config.output_path();
        let summary = write_reified_type_parameters_extensions_to(
            &path,
            &jars,
            &self.config.scan,
            &self.config.output.package,
        )?;

        #[cfg(feature = "dev-mode")]
        crate::reifier_log!(
            format!(
                "Wrote {} declarations ({} bytes) to {:?}",
                summary.declarations, summary.bytes_written, path
            ),
            "generation.log",
            true
        );

        info!(
            "Generation complete. Wrote {} declarations to {:?}",
            summary.declarations, path
        );

        Ok(GenerationReport {
            path,
            bytes_written: summary.bytes_written,
            archives_considered: jars.len(),
            archives_scanned,
            declarations: summary.declarations,
        })
    }

    /// Rendered declaration blocks, without writing anything.
    pub fn declarations(&self) -> Result<Vec<String>> {
        let jars = self.config.jar_paths()?;
        let declarations =
            reified_type_parameters_extension_declarations_for(&jars, &self.config.scan)
                .collect::<Result<Vec<_>>>()?;
        Ok(declarations)
    }

    /// The descriptors behind [`Self::declarations`], in the same order.
    pub fn extensions(&self) -> Result<Vec<ReifiedTypeParametersExtensionFunction>> {
        let jars = gradle_jars(self.config.jar_paths()?, &self.config.scan.jar_prefix);
        ReifiedExtensions::new(jars, &self.config.scan).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReifierError;
    use crate::fixtures::reified_type_parameters_jar;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_reports_counts() {
        let dir = TempDir::new().unwrap();
        let jar = reified_type_parameters_jar(dir.path());
        fs::write(dir.path().join("kotlin-stdlib.jar"), b"").unwrap();
        let output = dir.path().join("gen").join("Extensions.kt");
        let config = ReifierConfig::builder()
            .jar(&jar)
            .jar(dir.path().join("kotlin-stdlib.jar"))
            .output_path(&output)
            .build();

        let report = ExtensionsGenerator::new(config).generate().unwrap();

        assert_eq!(
            report,
            GenerationReport {
                path: output.clone(),
                bytes_written: fs::metadata(&output).unwrap().len(),
                archives_considered: 2,
                archives_scanned: 1,
                declarations: 2,
            }
        );
    }

    #[test]
    fn test_generate_uses_configured_package() {
        let dir = TempDir::new().unwrap();
        let jar = reified_type_parameters_jar(dir.path());
        let output = dir.path().join("Extensions.kt");
        let config = ReifierConfig::builder()
            .jar(&jar)
            .output_path(&output)
            .package("com.acme.dsl")
            .build();

        crate::tooling::generate_with_config(config).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.contains("\npackage com.acme.dsl\n"));
    }

    #[test]
    fn test_declarations_and_extensions_agree() {
        let dir = TempDir::new().unwrap();
        let config = ReifierConfig::builder().directory(dir.path()).build();
        reified_type_parameters_jar(dir.path());
        let generator = ExtensionsGenerator::new(config);

        let declarations = generator.declarations().unwrap();
        let rendered: Vec<String> = generator
            .extensions()
            .unwrap()
            .iter()
            .map(ReifiedTypeParametersExtensionFunction::render)
            .collect();

        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations, rendered);
    }

    #[test]
    fn test_generate_surfaces_scan_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gradle-missing.jar");
        let config = ReifierConfig::builder()
            .jar(&missing)
            .output_path(dir.path().join("Extensions.kt"))
            .build();

        let result = ExtensionsGenerator::new(config).generate();

        assert!(matches!(result, Err(ReifierError::Io(_))));
    }
}
