//! Info command - displays the effective configuration.

use super::load_config;
use crate::cli::Cli;
use reifier_core::codegen::gradle_jars;
use reifier_core::error::Result;

/// Runs the info command.
pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let jars = config.jar_paths()?;
    let scanned = gradle_jars(&jars, &config.scan.jar_prefix);

    println!("\n=== Configuration ===\n");
    println!("{}", config.to_toml()?);
    println!("=== Archives ({}) ===\n", jars.len());
    for jar in &jars {
        let marker = if scanned.contains(jar) { "scan" } else { "skip" };
        println!("  {} {}", marker, jar.display());
    }
    Ok(())
}
