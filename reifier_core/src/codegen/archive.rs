//! Archive walking: which jars, which entries, and the lazy descriptor stream over them.

use super::model::ReifiedTypeParametersExtensionFunction;
use super::scanner::{ClassRecord, select_functions_from};
use crate::config::ScanConfig;
use crate::error::Result;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::{debug, trace};
use zip::ZipArchive;

/// Keeps the archives whose file name starts with `prefix`, in input order.
pub fn gradle_jars<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>, prefix: &str) -> Vec<PathBuf> {
    paths
        .into_iter()
        .map(|path| path.as_ref().to_path_buf())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(prefix))
        })
        .collect()
}

/// Reads every candidate class entry of `jar`, in central-directory order.
///
/// The archive is closed before this returns, on success or failure.
pub fn select_classes_from(jar: &Path, config: &ScanConfig) -> Result<Vec<ClassRecord>> {
    debug!("Reading classes from {:?}", jar);
    let mut archive = ZipArchive::new(BufReader::new(File::open(jar)?))?;

    let mut records = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if !is_candidate_entry(entry.name(), config) {
            continue;
        }
        let entry_name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(capacity_hint(entry.size()));
        entry.read_to_end(&mut bytes)?;
        trace!(entry = %entry_name, size = bytes.len(), "read class entry");
        records.push(ClassRecord::new(entry_name, bytes));
    }

    debug!(count = records.len(), "Selected class entries from {:?}", jar);
    Ok(records)
}

/// Upper bound on preallocation; the declared size comes from the archive and is untrusted.
const MAX_ENTRY_PREALLOCATION: usize = 1 << 20;

fn capacity_hint(declared_size: u64) -> usize {
    usize::try_from(declared_size).map_or(MAX_ENTRY_PREALLOCATION, |size| {
        size.min(MAX_ENTRY_PREALLOCATION)
    })
}

fn is_candidate_entry(name: &str, config: &ScanConfig) -> bool {
    name.ends_with(".class")
        && !name.contains('$')
        && !name.contains("/internal/")
        && name.starts_with(&config.root_namespace)
}

/// All descriptors found in one archive, class by class.
pub fn reified_extensions_from(
    jar: &Path,
    config: &ScanConfig,
) -> Result<Vec<ReifiedTypeParametersExtensionFunction>> {
    let mut extensions = Vec::new();
    for record in select_classes_from(jar, config)? {
        extensions.extend(select_functions_from(&record, config)?);
    }
    Ok(extensions)
}

/// Lazy descriptor stream over a list of archives.
///
/// Archives are opened one at a time, when the previous one is exhausted.
/// The first error is yielded once and ends the stream.
pub struct ReifiedExtensions<'a> {
    jars: std::vec::IntoIter<PathBuf>,
    config: &'a ScanConfig,
    pending: std::vec::IntoIter<ReifiedTypeParametersExtensionFunction>,
    archives_scanned: usize,
    failed: bool,
}

impl<'a> ReifiedExtensions<'a> {
    pub fn new(jars: Vec<PathBuf>, config: &'a ScanConfig) -> Self {
        Self {
            jars: jars.into_iter(),
            config,
            pending: Vec::new().into_iter(),
            archives_scanned: 0,
            failed: false,
        }
    }

    /// Number of archives opened so far.
    pub fn archives_scanned(&self) -> usize {
        self.archives_scanned
    }
}

impl Iterator for ReifiedExtensions<'_> {
    type Item = Result<ReifiedTypeParametersExtensionFunction>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(extension) = self.pending.next() {
                return Some(Ok(extension));
            }
            let jar = self.jars.next()?;
            self.archives_scanned += 1;
            match reified_extensions_from(&jar, self.config) {
                Ok(extensions) => self.pending = extensions.into_iter(),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
