//! Shard loading probe.
//!
//! # Responsibility
//! - Register shard files in command-line order against one dispatcher.
//! - Initialize the registry at a chosen point and print it as JSON.

use clap::Parser;
use implementors_core::{
    default_log_level, init_logging, load_shard_file, ImplementorDispatcher, ImplementorRegistry,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "implementors", version, about = "Merge trait implementor shards")]
struct Args {
    /// Shard files (`{"<crate>": ["<markup>", ...]}`), registered in order.
    #[arg(required = true)]
    shards: Vec<PathBuf>,

    /// Initialize the registry after this many shards; defaults to after all.
    #[arg(long)]
    init_after: Option<usize>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("implementors: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, String> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    let init_after = args.init_after.unwrap_or(args.shards.len());
    if init_after > args.shards.len() {
        return Err(format!(
            "--init-after {init_after} exceeds shard count {}",
            args.shards.len()
        ));
    }

    let mut dispatcher = ImplementorDispatcher::new();
    for (index, path) in args.shards.iter().enumerate() {
        if index == init_after {
            initialize(&mut dispatcher)?;
        }
        let payload = load_shard_file(path).map_err(|err| err.to_string())?;
        dispatcher.register(payload);
    }
    if init_after == args.shards.len() {
        initialize(&mut dispatcher)?;
    }

    let registry = dispatcher
        .sink()
        .ok_or_else(|| "registry was not initialized".to_string())?;
    info!(
        "event=cli_done module=cli status=ok crates={} implementors={}",
        registry.len(),
        registry.implementor_count()
    );
    render(registry)
}

fn initialize(dispatcher: &mut ImplementorDispatcher) -> Result<(), String> {
    dispatcher
        .initialize(ImplementorRegistry::new(), None)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn render(registry: &ImplementorRegistry) -> Result<String, String> {
    let mut object = serde_json::Map::new();
    for (crate_name, implementors) in registry.iter() {
        let value = serde_json::to_value(implementors).map_err(|err| err.to_string())?;
        object.insert(crate_name.to_string(), value);
    }
    serde_json::to_string_pretty(&serde_json::Value::Object(object)).map_err(|err| err.to_string())
}
