use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use joinmeta::{
    config::JoinMetadataConfig, description::JoinDescription, ColumnResolution, RecordMetadata,
};

/// Joinmeta - Inspect the merged metadata of a join
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file describing the joined tables
    join_file: PathBuf,

    /// YAML file with key store settings (defaults to JOINMETA_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column name to resolve against the merged metadata, may be repeated
    #[arg(long = "resolve", value_name = "NAME")]
    names: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => JoinMetadataConfig::from_yaml_file(path),
        None => JoinMetadataConfig::from_env(),
    }
    .context("Configuration error")?;

    let description = JoinDescription::from_yaml_file(&cli.join_file)
        .with_context(|| format!("Cannot load {}", cli.join_file.display()))?;
    let metadata = description
        .build(&config)
        .context("Cannot build join metadata")?
        .into_shared();

    println!("{}", metadata.to_snapshot().to_json()?);

    for name in &cli.names {
        match metadata.resolve(name) {
            ColumnResolution::Found(index) => println!("{} -> {}", name, index),
            ColumnResolution::Ambiguous => println!("{} -> ambiguous", name),
            ColumnResolution::NotFound => println!("{} -> not found", name),
        }
    }

    metadata.close();
    Ok(())
}
