use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;

use extconf_loader::{load_manifest, ExtensionDefinition, ExtensionLoader, LoadManifest, LoaderError};
use extconf_merge::{PathIndex, PathKind};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Merge(args) => cmd_merge(args, &format),
        Command::Check(args) => cmd_check(args),
        Command::Paths(args) => cmd_paths(args, &format),
        Command::Blame(args) => cmd_blame(args, &format),
    }
}

fn load_sources(sources: &SourceArgs) -> Result<ExtensionLoader, LoaderError> {
    if let Some(path) = &sources.manifest {
        debug!(manifest = %path.display(), "loading from manifest");
        return load_manifest(&LoadManifest::from_path(path)?);
    }
    let mut loader = ExtensionLoader::new();
    for path in &sources.files {
        loader.load(&ExtensionDefinition::from_path(path)?)?;
    }
    Ok(loader)
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_merge(args: MergeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let loader = load_sources(&args.sources)?;
    let state = loader.state();
    let sections = [
        (Show::Config, "config", &state.config),
        (Show::Meta, "meta", &state.meta),
    ];
    let settings = loader.resolved_settings();

    match format {
        OutputFormat::Json => {
            let value = match args.show {
                Show::Config => state.config.clone(),
                Show::Meta => state.meta.clone(),
                Show::Settings => settings,
                Show::All => json!({
                    "extensions": loader.loaded(),
                    "config": state.config,
                    "meta": state.meta,
                    "settings": settings,
                }),
            };
            print_json(&value)?;
        }
        OutputFormat::Text => {
            println!(
                "{} Merged {} extension(s): {}",
                "✓".green().bold(),
                loader.loaded().len(),
                loader.loaded().join(", ").yellow()
            );
            for (show, label, tree) in sections {
                if args.show == show || args.show == Show::All {
                    println!("\n{}", label.bold());
                    print_json(tree)?;
                }
            }
            if matches!(args.show, Show::Settings | Show::All) {
                println!("\n{}", "settings".bold());
                print_json(&settings)?;
            }
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    match load_sources(&args.sources) {
        Ok(loader) => {
            println!(
                "{} {} extension(s) merged without conflicts",
                "✓".green().bold(),
                loader.loaded().len()
            );
            Ok(())
        }
        Err(LoaderError::Merge(conflict)) => {
            eprintln!("{} {} conflict at {}", "✗".red().bold(), conflict.kind(), conflict.path().to_string().yellow());
            eprintln!("{conflict}");
            anyhow::bail!("`{}` could not be merged", conflict.extension())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_paths(args: PathsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let definition = ExtensionDefinition::from_path(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;
    let index = if args.meta {
        PathIndex::extract(&definition.layer.meta, false)
    } else {
        PathIndex::extract(&definition.layer.config, true)
    };

    match format {
        OutputFormat::Json => {
            let entries: Vec<Value> = index
                .iter()
                .map(|(path, kind)| json!({ "path": path, "kind": kind }))
                .collect();
            print_json(&json!({ "extension": definition.name, "paths": entries }))?;
        }
        OutputFormat::Text => {
            println!("{} ({} paths)", definition.name.bold(), index.len());
            for (path, kind) in index.iter() {
                let label = match kind {
                    PathKind::Group => "group".cyan(),
                    PathKind::Value => "value".dimmed(),
                };
                println!("  {label:>5}  {path}");
            }
        }
    }
    Ok(())
}

fn cmd_blame(args: BlameArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let loader = load_sources(&args.sources)?;
    let attribution = loader.attribution(&args.path);

    match format {
        OutputFormat::Json => print_json(&json!({
            "path": args.path,
            "extensions": attribution.to_value(),
        }))?,
        OutputFormat::Text if attribution.is_empty() => {
            println!("{} has no recorded contributors", args.path.to_string().yellow());
        }
        OutputFormat::Text => {
            println!("{}", args.path.to_string().yellow().bold());
            for name in attribution.iter() {
                println!("  {} {}", "-".dimmed(), name);
            }
        }
    }
    Ok(())
}
