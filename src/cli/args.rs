//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Run Lua scripts against Rust functions exposed with markers.
#[derive(Parser, Debug)]
#[command(name = "luatag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a Lua script file.
    Run(RunArgs),

    /// Evaluate a Lua expression and print the result.
    Eval(EvalArgs),

    /// List the functions the host API exposes.
    Exports(ExportsArgs),
}

/// Options shared by commands that build an engine.
#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Configuration file (defaults to the user config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run with the full Lua standard library.
    #[arg(long)]
    pub no_sandbox: bool,

    /// Namespace to register the host API under, overriding the config.
    #[arg(long)]
    pub namespace: Option<String>,
}

/// Arguments for the run command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the script.
    pub script: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the eval command.
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Lua code, e.g. `return host.version()`.
    pub code: String,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the exports command.
#[derive(Parser, Debug)]
pub struct ExportsArgs {
    /// Configuration file whose namespace is listed.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Namespace to list keys under, overriding the config.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}
