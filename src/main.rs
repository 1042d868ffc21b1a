//! Luatag CLI - run Lua against Rust functions exposed with markers.

use anyhow::{Context, Result};
use clap::Parser;
use mlua::Value;
use tracing_subscriber::EnvFilter;

use luatag::cli::args::{EngineArgs, EvalArgs, ExportsArgs, RunArgs};
use luatag::cli::{Cli, Command};
use luatag::config::Config;
use luatag::lua::{format_value, HostApi, LuaEngine, Script};
use luatag::{tagged_exports, MethodFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run_script(args),
        Command::Eval(args) => run_eval(args),
        Command::Exports(args) => run_exports(args),
    }
}

fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    // A subscriber may already be set when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_engine(args: &EngineArgs) -> Result<LuaEngine> {
    let mut config = Config::resolve(args.config.as_deref()).context("Failed to load config")?;
    if args.no_sandbox {
        config.sandbox = false;
    }
    if let Some(namespace) = &args.namespace {
        config.namespace = namespace.clone();
    }

    init_logging(&config);
    tracing::debug!(sandbox = config.sandbox, namespace = %config.namespace, "building engine");
    LuaEngine::from_config(&config)
}

fn run_script(args: RunArgs) -> Result<()> {
    let engine = build_engine(&args.engine)?;
    let script = Script::from_file(&args.script)?;
    let result = script.run(&engine)?;
    print_result(&result);
    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    let engine = build_engine(&args.engine)?;
    let result = engine.eval_value(&args.code)?;
    print_result(&result);
    Ok(())
}

fn run_exports(args: ExportsArgs) -> Result<()> {
    let namespace = match args.namespace {
        Some(namespace) => namespace,
        None => {
            Config::resolve(args.config.as_deref())
                .context("Failed to load config")?
                .namespace
        }
    };
    let filter = MethodFilter::PUBLIC_INSTANCE | MethodFilter::PUBLIC_STATIC;
    let exports = tagged_exports::<HostApi>(filter, &namespace)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&exports)?);
        return Ok(());
    }

    let width = exports.iter().map(|e| e.key.len()).max().unwrap_or(0);
    for export in &exports {
        println!(
            "{:<width$}  {:<8}  {}",
            export.key,
            export.kind.as_str(),
            export.description.as_deref().unwrap_or(""),
            width = width
        );
    }
    Ok(())
}

fn print_result(value: &Value) {
    if !value.is_nil() {
        println!("{}", format_value(value));
    }
}
