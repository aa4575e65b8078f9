///
/// This module implements the CLI interface for docsforai: command parsing,
/// argument handling and user-visible output.
///
/// All business logic (detection, parsing, consolidation, downloads) lives in
/// the `docsforai-core` crate; this module only wires configuration and the
/// system implementations of the core seams together.
///
/// For programmatic or integration use, call [`run`] with a constructed [`Cli`].
use crate::load_config::load_config;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docsforai_core::acquire::GitRepositoryProvider;
use docsforai_core::convert::Html2MdConverter;
use docsforai_core::detect::detect;
use docsforai_core::pipeline::build_documentation;
use docsforai_core::prebuilt::PrebuiltDownloader;
use docsforai_core::tool::SystemToolRunner;
use std::fs;
use std::path::PathBuf;

pub const CONFIG_TEMPLATE: &str = include_str!("../templates/docsforai.yaml");

/// Working directory for remote checkouts, relative to the current directory.
pub const DEFAULT_WORKDIR: &str = ".docsforai";

/// CLI for docsforai: turn a project's documentation into one Markdown bundle.
#[derive(Parser)]
#[clap(
    name = "docsforai",
    version,
    about = "Build and download documentation bundles for offline and LLM use"
)]
pub struct Cli {
    /// Enable debug logging
    #[clap(long, global = true)]
    pub debug: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build documentation as configured in a YAML file
    Build {
        /// Path to the YAML config file
        config: PathBuf,
        /// Where remote repositories are checked out
        #[clap(long, default_value = DEFAULT_WORKDIR)]
        workdir: PathBuf,
    },
    /// Download prebuilt documentation for a package
    Download {
        package: String,
        /// Specific version (defaults to the latest available)
        #[clap(long, short = 'v')]
        version: Option<String>,
        #[clap(long, short = 'o', default_value = "./docs")]
        output: PathBuf,
    },
    /// Write a template configuration file
    Init {
        #[clap(long, short = 'o', default_value = "docsforai.yaml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
    /// Print the documentation framework detected at a path
    Detect { path: PathBuf },
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Build { config, workdir } => {
            let config = load_config(config)?;
            tracing::info!(command = "build", "Starting documentation build");
            let report = build_documentation(
                &config,
                &GitRepositoryProvider,
                &SystemToolRunner,
                &Html2MdConverter,
                &workdir,
            )
            .await
            .map_err(|e| {
                tracing::error!(command = "build", error = %e, "Build failed");
                anyhow::Error::new(e).context("Failed to build documentation")
            })?;
            tracing::info!(command = "build", ?report, "Build complete");
            for skipped in &report.skipped {
                eprintln!("skipped {}: {}", skipped.path, skipped.reason);
            }
            println!("{}", report.output_path.display());
            Ok(())
        }
        Commands::Download {
            package,
            version,
            output,
        } => {
            tracing::info!(command = "download", package = %package, "Downloading prebuilt documentation");
            let downloader = PrebuiltDownloader::new_from_env();
            let path = downloader
                .download(&package, version.as_deref(), &output)
                .await
                .with_context(|| format!("Failed to download documentation for {package}"))?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Init { output, force } => {
            if output.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite it",
                    output.display()
                );
            }
            fs::write(&output, CONFIG_TEMPLATE)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(command = "init", path = %output.display(), "Wrote configuration template");
            println!("{}", output.display());
            Ok(())
        }
        Commands::Detect { path } => {
            let framework = detect(&path)?;
            tracing::info!(command = "detect", framework = %framework, "Detection complete");
            println!("{framework}");
            Ok(())
        }
    }
}
