//! Generate command - scans the jars and writes the extensions file.

use super::{load_config, with_jars};
use crate::cli::{Cli, GenerateArgs};
use reifier_core::{error::Result, tooling::ExtensionsGenerator};
use tracing::{debug, info};

/// Runs the generate command.
pub fn run(cli: &Cli, args: GenerateArgs) -> Result<()> {
    info!("Starting extension generation");

    let mut config = with_jars(load_config(cli)?, &args.jars);
    if let Some(output) = &args.output {
        debug!("Output path overridden: {:?}", output);
        config.output.path = output.to_string_lossy().into_owned();
    }

    let report = ExtensionsGenerator::new(config).generate()?;

    if !cli.quiet {
        println!(
            "Wrote {} declarations ({} bytes) to {} ({} of {} archives scanned)",
            report.declarations,
            report.bytes_written,
            report.path.display(),
            report.archives_scanned,
            report.archives_considered
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use reifier_core::codegen::{DEFAULT_PACKAGE, file_header};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_without_matching_jars_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("reifier.toml");
        fs::write(&config, "").unwrap();
        let output = dir.path().join("out").join("Extensions.kt");
        let cli = Cli::parse_from([
            "reifier",
            "-q",
            "--config",
            config.to_str().unwrap(),
            "generate",
            "kotlin-stdlib.jar",
            "-o",
            output.to_str().unwrap(),
        ]);
        let crate::cli::Commands::Generate(args) = cli.command.clone() else {
            panic!("expected generate");
        };

        run(&cli, args).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), file_header(DEFAULT_PACKAGE));
    }
}
