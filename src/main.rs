#![forbid(unsafe_code)]

mod watch;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use strata_runtime::ChunkRuntime;
use strata_world::{Chunk, World, WorldConfig, load_config_from_path};

/// Generates a chunked iso-surface world from a TOML description.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(about = "Procedural scalar fields meshed with marching cubes", long_about = None)]
struct Args {
    /// World configuration (TOML).
    #[arg(short, long, default_value = "assets/world.toml")]
    config: PathBuf,

    /// Chunk workers; overrides `runtime.workers`.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Regenerate whenever the config file changes.
    #[arg(short, long)]
    watch: bool,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

pub(crate) fn report(chunks: &[Chunk]) {
    let mut vertices = 0usize;
    let mut triangles = 0usize;
    for c in chunks {
        log::info!(
            "chunk {}: {} vertices, {} triangles",
            c.desc.coord,
            c.mesh.vertex_count(),
            c.mesh.triangle_count()
        );
        vertices += c.mesh.vertex_count();
        triangles += c.mesh.triangle_count();
    }
    log::info!(
        "{} chunks ({} empty), {} vertices, {} triangles",
        chunks.len(),
        chunks.iter().filter(|c| c.is_empty()).count(),
        vertices,
        triangles
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let config = if args.config.exists() {
        log::info!("loading world config from {}", args.config.display());
        load_config_from_path(&args.config)?
    } else {
        log::warn!(
            "{} not found; using the default world",
            args.config.display()
        );
        WorldConfig::default()
    };

    let mut rt_cfg = config.runtime.clone();
    if let Some(n) = args.threads {
        rt_cfg.workers = n;
    }
    let mut runtime = ChunkRuntime::from_config(&rt_cfg)?;
    let world = World::new(config)?;

    let chunks = runtime.regenerate(&world)?;
    report(&chunks);

    if args.watch {
        let events = watch::spawn_config_watcher(args.config.clone());
        log::info!("watching {} for changes", args.config.display());
        while watch::wait_and_reload(&events, &args.config, &world, &mut runtime) {}
    }
    Ok(())
}
