//! Kotlin source output.

use super::archive::{ReifiedExtensions, gradle_jars};
use crate::config::ScanConfig;
use crate::error::Result;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

pub const DEFAULT_PACKAGE: &str = "org.gradle.kotlin.dsl";

/// Counts reported after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub declarations: usize,
    pub bytes_written: u64,
}

/// The fixed text every generated file starts with.
pub fn file_header(package: &str) -> String {
    format!(
        "// This file is generated. Do not edit.\n\
         \n\
         @file:Suppress(\"nothing_to_inline\", \"unused\")\n\
         \n\
         package {package}\n"
    )
}

/// Rendered declaration blocks for every eligible method of the prefix-matching jars.
pub fn reified_type_parameters_extension_declarations_for<'a, P: AsRef<Path>>(
    jars: impl IntoIterator<Item = P>,
    config: &'a ScanConfig,
) -> impl Iterator<Item = Result<String>> + 'a {
    let jars = gradle_jars(jars, &config.jar_prefix);
    debug!(count = jars.len(), "Archives matching prefix '{}'", config.jar_prefix);
    rendered(jars, config)
}

fn rendered(jars: Vec<PathBuf>, config: &ScanConfig) -> impl Iterator<Item = Result<String>> + '_ {
    ReifiedExtensions::new(jars, config).map(|extension| extension.map(|f| f.render()))
}

/// Writes `header` and then each block surrounded by newlines.
///
/// Returns the number of blocks written. Stops at the first error; whatever
/// was already written stays written.
pub fn write_declarations<W: Write>(
    out: &mut W,
    header: &str,
    declarations: impl IntoIterator<Item = Result<String>>,
) -> Result<usize> {
    out.write_all(header.as_bytes())?;
    let mut count = 0;
    for declaration in declarations {
        let declaration = declaration?;
        out.write_all(b"\n")?;
        out.write_all(declaration.as_bytes())?;
        out.write_all(b"\n")?;
        count += 1;
    }
    Ok(count)
}

/// Scans `jars` and writes the generated Kotlin file to `path`.
pub fn write_reified_type_parameters_extensions_to<P: AsRef<Path>>(
    path: &Path,
    jars: impl IntoIterator<Item = P>,
    config: &ScanConfig,
    package: &str,
) -> Result<WriteSummary> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    let declarations = write_declarations(
        &mut out,
        &file_header(package),
        reified_type_parameters_extension_declarations_for(jars, config),
    )?;
    out.flush()?;
    drop(out);

    let bytes_written = fs::metadata(path)?.len();
    info!(declarations, bytes_written, "Wrote {:?}", path);
    Ok(WriteSummary {
        declarations,
        bytes_written,
    })
}
