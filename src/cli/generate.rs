//! Handler for the `generate` command.

use crate::cli::{Cli, GenerateArgs};
use crate::error::Result;
use crate::ingest::loader;

/// Execute the generate command.
pub fn execute(_cli: &Cli, args: &GenerateArgs) -> Result<()> {
    loader::generate_bets(&args.file, args.records)?;
    println!("Generated {} records in {}", args.records, args.file.display());
    Ok(())
}
