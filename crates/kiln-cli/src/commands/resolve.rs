//! Resolve command: fetch missing external components into the cache

use anyhow::Result;
use kiln_resolver::{HttpFetcher, Resolver, ResolverConfig, SidecarInspector};
use std::path::PathBuf;
use std::time::Duration;

pub struct ResolveArgs {
    /// Path to the project manifest
    pub manifest: PathBuf,
    /// Per-fetch timeout in seconds
    pub timeout: u64,
    /// Verbose output
    pub verbose: bool,
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let (project, layout) = super::load_project(&args.manifest)?;
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout))?;
    let inspector = SidecarInspector;
    let resolver = Resolver::new(&fetcher, &inspector).with_config(ResolverConfig {
        verbose: args.verbose,
    });

    let cache = resolver.resolve(&project, &layout)?;
    let names = cache.names()?;
    if names.is_empty() {
        println!("No external components required");
    } else {
        println!("{} external components in {}", names.len(), cache.directory().display());
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}
