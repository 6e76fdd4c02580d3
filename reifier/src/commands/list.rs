//! List command - prints the extensions without writing the output file.

use super::{load_config, with_jars};
use crate::cli::{Cli, ListArgs, ListFormat};
use reifier_core::{error::Result, tooling::ExtensionsGenerator};
use tracing::info;

/// Runs the list command.
pub fn run(cli: &Cli, args: ListArgs) -> Result<()> {
    let config = with_jars(load_config(cli)?, &args.jars);
    let generator = ExtensionsGenerator::new(config);

    match args.format {
        ListFormat::Pretty => {
            let declarations = generator.declarations()?;
            info!(count = declarations.len(), "Found extensions");
            println!("{}", declarations.join("\n\n"));
        }
        ListFormat::Json => {
            let extensions = generator.extensions()?;
            info!(count = extensions.len(), "Found extensions");
            println!("{}", serde_json::to_string_pretty(&extensions)?);
        }
    }
    Ok(())
}
