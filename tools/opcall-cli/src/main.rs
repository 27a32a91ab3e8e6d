//! opcall Command Line Tool
//!
//! Provides commands for working with registry manifests:
//! - validate: Validate a registry manifest file
//! - list: List the operations a manifest defines
//! - call: Invoke an operation and print the uniform call result

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use opcall_core::{CallArgs, RegistryManifest};
use opcall_http::OpClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "opcall")]
#[command(version)]
#[command(about = "opcall Command Line Tool - Validate registries and invoke operations")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a registry manifest file
    #[command(about = "Validate a registry manifest JSON file")]
    Validate {
        /// Path to the manifest file to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List operations defined by a manifest
    #[command(about = "List each operation's method, name, and URL template")]
    List {
        /// Path to the manifest file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Invoke an operation
    #[command(about = "Invoke an operation and print the call result as JSON")]
    Call {
        /// Path to the manifest file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Operation name to invoke (e.g., getUserTodos)
        #[arg(value_name = "OPERATION")]
        operation: String,

        /// Interpolation argument as KEY=VALUE (repeatable)
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// Read the request payload from a JSON file
        #[arg(long, value_name = "FILE")]
        payload: Option<PathBuf>,

        /// Override the manifest's base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opcall=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => handle_validate(&file),
        Commands::List { file } => handle_list(&file),
        Commands::Call {
            file,
            operation,
            args,
            payload,
            base_url,
        } => handle_call(&file, &operation, &args, payload.as_deref(), base_url).await,
    }
}

fn load_manifest(file: &Path) -> Result<RegistryManifest> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    RegistryManifest::from_json(&json)
        .with_context(|| format!("Failed to parse {} as registry manifest", file.display()))
}

fn handle_validate(file: &Path) -> Result<()> {
    let manifest = load_manifest(file)?;
    let registry = manifest
        .build_registry()
        .with_context(|| "Manifest validation failed")?;
    println!("Valid registry manifest ({} operations)", registry.len());
    Ok(())
}

fn handle_list(file: &Path) -> Result<()> {
    let manifest = load_manifest(file)?;
    let registry = manifest
        .build_registry()
        .with_context(|| "Manifest validation failed")?;

    for name in registry.names() {
        // Names come from the registry, so the lookup cannot miss
        if let Some(descriptor) = registry.get(name) {
            println!(
                "{:6} {:24} {}",
                descriptor.method, descriptor.name, descriptor.template
            );
        }
    }
    Ok(())
}

async fn handle_call(
    file: &Path,
    operation: &str,
    raw_args: &[String],
    payload: Option<&Path>,
    base_url: Option<String>,
) -> Result<()> {
    let mut manifest = load_manifest(file)?;
    if let Some(base_url) = base_url {
        manifest.base_url = base_url;
    }
    let registry = manifest
        .build_registry()
        .with_context(|| "Manifest validation failed")?;

    let mut args = CallArgs::new();
    for raw in raw_args {
        let (key, value) = parse_arg(raw)?;
        args.insert(key, value);
    }

    let payload = match payload {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload file: {}", path.display()))?;
            Some(
                serde_json::from_str(&json)
                    .with_context(|| format!("Failed to parse {} as JSON", path.display()))?,
            )
        }
        None => None,
    };

    let client = OpClient::new(Arc::new(registry));
    let result = client.call(operation, payload, &args).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_arg(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid --arg '{raw}': expected KEY=VALUE"),
    }
}
