//! Init command - initializes reifier.toml configuration.

use crate::cli::{Cli, InitArgs};
use reifier_core::config::{CONFIG_FILE_NAME, ReifierConfig};
use reifier_core::error::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Runs the init command.
pub fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    if write_config(Path::new(CONFIG_FILE_NAME), args.force)? {
        info!("Created {}", CONFIG_FILE_NAME);
        info!("Next steps:");
        info!("  1. List your Gradle API jars under [classpath]");
        info!("  2. Run 'reifier generate'");
    }
    Ok(())
}

/// Writes the starter configuration; returns whether anything was written.
fn write_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        error!("{} already exists. Use --force to overwrite.", path.display());
        return Ok(false);
    }
    fs::write(path, generate_full_config())?;
    Ok(true)
}

fn generate_full_config() -> String {
    let defaults = ReifierConfig::default();
    format!(
        r#"# Reifier Configuration

[scan]
# Only archives whose file name starts with this prefix are scanned
jar_prefix = "{jar_prefix}"
# Only class entries under this package path are scanned
root_namespace = "{root_namespace}"
# Fully-qualified type names to leave alone
type_class_name_blacklist = []
# Method names never wrapped
method_name_blacklist = ["apply"]

[output]
path = "{path}"
package = "{package}"

[classpath]
# Explicit archives, scanned first and in this order
jars = []
# Directories searched recursively for *.jar, e.g. "${{GRADLE_HOME:-/opt/gradle}}/lib"
directories = []
"#,
        jar_prefix = defaults.scan.jar_prefix,
        root_namespace = defaults.scan.root_namespace,
        path = defaults.output.path,
        package = defaults.output.package,
    )
}
