#![deny(missing_docs)]

//! # tsmapper CLI
//!
//! Command line front end for the TypeScript declaration generator.
//!
//! Inspects an exported API metadata document for service operations and
//! produces TypeScript declarations for all the command parameter and DTO
//! classes they use.

use clap::Parser;
use std::path::PathBuf;
use tsmapper_core::MapperResult;

mod generate;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Generates TypeScript client declarations from an exported API metadata document"
)]
struct Cli {
    /// Path to the exported type-universe metadata document (.json or .yaml).
    #[clap(long)]
    metadata: PathBuf,

    /// Output path for the generated TypeScript. Omit to print to stdout.
    #[clap(long)]
    output: Option<PathBuf>,

    /// Optional custom mapping configuration (.json or .yaml list).
    #[clap(long)]
    mappings: Option<PathBuf>,

    /// Embed debug annotations as comments in the generated code.
    #[clap(long)]
    debug: bool,
}

fn main() -> MapperResult<()> {
    let cli = Cli::parse();

    let args = generate::GenerateArgs {
        metadata: cli.metadata,
        output: cli.output,
        mappings: cli.mappings,
        debug: cli.debug,
    };
    generate::execute(&args)
}
