use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod manifest;

/// Kiln modular build orchestrator.
///
/// Kiln reads a declarative `kiln.toml` manifest describing spaces of
/// modular units, resolves external components into a local cache, and
/// drives the host toolchain (compiler, archiver, launcher) in
/// dependency order.
///
/// EXAMPLES:
///     kiln build                   Build every space
///     kiln build --dry-run         Print composed tool calls
///     kiln resolve                 Fetch missing external components
///     kiln info                    Show the assembled project structure
#[derive(Parser)]
#[command(name = "kiln")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every space of the project in dependency order
    #[command(visible_alias = "b")]
    Build {
        /// Path to the project manifest
        #[arg(long, default_value = manifest::MANIFEST_FILE)]
        manifest: PathBuf,
        /// Feature release of the host toolchain
        #[arg(long, default_value_t = 21, env = "KILN_FEATURE")]
        feature: u16,
        /// Build one space at a time
        #[arg(long)]
        sequential: bool,
        /// Skip the archive date stamp
        #[arg(long)]
        no_date: bool,
        /// Print composed tool calls instead of running them
        #[arg(long)]
        dry_run: bool,
        /// Verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Fetch missing external components into the local cache
    #[command(visible_alias = "r")]
    Resolve {
        /// Path to the project manifest
        #[arg(long, default_value = manifest::MANIFEST_FILE)]
        manifest: PathBuf,
        /// Per-fetch timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
        /// Verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Show the assembled project structure
    Info {
        /// Path to the project manifest
        #[arg(long, default_value = manifest::MANIFEST_FILE)]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            manifest,
            feature,
            sequential,
            no_date,
            dry_run,
            verbose,
        } => commands::build::run(commands::build::BuildArgs {
            manifest,
            feature,
            sequential,
            no_date,
            dry_run,
            verbose,
        }),
        Commands::Resolve {
            manifest,
            timeout,
            verbose,
        } => commands::resolve::run(commands::resolve::ResolveArgs {
            manifest,
            timeout,
            verbose,
        }),
        Commands::Info { manifest } => commands::info::run(commands::info::InfoArgs { manifest }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults() {
        let cli = Cli::parse_from(["kiln", "build"]);
        match cli.command {
            Commands::Build {
                manifest,
                feature,
                sequential,
                dry_run,
                ..
            } => {
                assert_eq!(manifest, PathBuf::from("kiln.toml"));
                assert_eq!(feature, 21);
                assert!(!sequential);
                assert!(!dry_run);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn resolve_accepts_timeout() {
        let cli = Cli::parse_from(["kiln", "resolve", "--timeout", "5"]);
        match cli.command {
            Commands::Resolve { timeout, .. } => assert_eq!(timeout, 5),
            _ => panic!("expected resolve command"),
        }
    }
}
