use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use cityforge_common::RoadKind;
use cityforge_mesh::{MeshQueue, RoadVertex};
use cityforge_stream::{ChunkCoord, CityWorld, WorldConfig};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cityforge-cli", about = "CLI tool for cityforge procedural cities")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WorldArgs {
    /// World seed; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,
    /// World config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl WorldArgs {
    fn world(&self) -> anyhow::Result<CityWorld> {
        let mut config = match &self.config {
            Some(path) => WorldConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => WorldConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        debug!(seed = config.seed, world_size = config.layout.world_size, "building world");
        Ok(CityWorld::new(config)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a city and print its summary
    Generate {
        #[command(flatten)]
        world: WorldArgs,
    },
    /// Write the city snapshot as JSON
    Export {
        #[command(flatten)]
        world: WorldArgs,
        /// Output file
        #[arg(short, long, default_value = "city.json")]
        output: PathBuf,
    },
    /// Walk an observer in a straight line and print each update
    Walk {
        #[command(flatten)]
        world: WorldArgs,
        /// Start point as X,Z
        #[arg(long, value_delimiter = ',', num_args = 2, default_values_t = [0.0, 0.0])]
        from: Vec<f64>,
        /// End point as X,Z
        #[arg(long, value_delimiter = ',', num_args = 2, default_values_t = [600.0, 0.0])]
        to: Vec<f64>,
        /// Number of updates along the path
        #[arg(long, default_value = "10")]
        steps: u32,
        /// Chunks meshed per update
        #[arg(long, default_value = "16")]
        load_budget: usize,
    },
    /// Mesh the chunks around a point and print buffer sizes
    Mesh {
        #[command(flatten)]
        world: WorldArgs,
        #[arg(long, default_value = "0")]
        x: f64,
        #[arg(long, default_value = "0")]
        z: f64,
        /// Square radius in chunks
        #[arg(long, default_value = "1")]
        radius: i32,
        /// Mesh worker threads (0 = rayon default)
        #[arg(long, default_value = "0")]
        threads: usize,
    },
}

/// Write the snapshot as pretty JSON. Returns its size and hex SHA-256.
fn export(world: &CityWorld, output: &Path) -> anyhow::Result<(usize, String)> {
    let json = serde_json::to_string_pretty(world.layout().as_ref())?;
    std::fs::write(output, &json).with_context(|| format!("writing {}", output.display()))?;
    let digest = format!("{:x}", Sha256::digest(json.as_bytes()));
    info!(path = %output.display(), bytes = json.len(), sha256 = %digest, "snapshot exported");
    Ok((json.len(), digest))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("cityforge-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", cityforge_common::crate_info());
            println!("noise: {}", cityforge_noise::crate_info());
            println!("district: {}", cityforge_district::crate_info());
            println!("layout: {}", cityforge_layout::crate_info());
            println!("mesh: {}", cityforge_mesh::crate_info());
            println!("stream: {}", cityforge_stream::crate_info());
        }
        Commands::Generate { world } => {
            let world = world.world()?;
            let city = world.layout();
            println!("City: seed={}, world_size={}", city.seed(), city.world_size());
            println!(
                "Roads: boulevards={}, streets={}, alleys={}, intersections={}",
                city.road_count(RoadKind::Boulevard),
                city.road_count(RoadKind::Street),
                city.road_count(RoadKind::Alley),
                city.intersections().len()
            );
            println!(
                "Blocks: {}, plots: {}, buildable: {}",
                city.blocks().len(),
                city.plots().len(),
                city.buildable_plots().count()
            );
            for landmark in city.landmarks() {
                println!(
                    "  landmark {} at ({:.1}, {:.1}) block={}",
                    landmark.definition.name,
                    landmark.position.x,
                    landmark.position.y,
                    landmark.block.0
                );
            }
            for (district, stats) in city.district_stats() {
                println!(
                    "  {district}: blocks={}, plots={}, buildable={}",
                    stats.blocks, stats.plots, stats.buildable_plots
                );
            }
            println!("Diagnostics: {}", city.diagnostics());
            println!("State hash: {:#018x}", city.state_hash());
        }
        Commands::Export { world, output } => {
            let world = world.world()?;
            let (bytes, digest) = export(&world, &output)?;
            println!(
                "Exported seed={} to {} ({bytes} bytes)",
                world.seed(),
                output.display()
            );
            println!("sha256: {digest}");
        }
        Commands::Walk {
            world,
            from,
            to,
            steps,
            load_budget,
        } => {
            let mut world = world.world()?;
            let mut queue = world.inline_mesh_queue()?;
            world.on_update(|state| {
                println!(
                    "tick={} chunk={} district={} visible={} loaded={} load_q={} \
                     unload_q={} plots={} roads={}",
                    state.tick,
                    state.observer_chunk,
                    state.district,
                    state.visible_count(),
                    state.loaded_count,
                    state.load_queue_len,
                    state.unload_queue_len,
                    state.nearby_plots.len(),
                    state.nearby_roads.len()
                );
            });

            let steps = steps.max(1);
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let x = from[0] + (to[0] - from[0]) * t;
                let z = from[1] + (to[1] - from[1]) * t;
                let y = world.terrain_height_at(x, z);
                world.update_position(x, y, z);

                let manager = world.manager_mut();
                manager.process_load_queue(load_budget, &mut queue);
                while let Some(request) = manager.pop_unload() {
                    if let Some(ticket) = request.mesh {
                        queue.take(ticket);
                    }
                }
            }

            let stats = world.manager().stats();
            let timer = world.manager().frame_timer();
            info!(updates = stats.updates, evictions = stats.evictions, "walk finished");
            println!(
                "Done: cached={}, evictions={}, out_of_bounds(last)={}, avg update {:?}, max {:?}",
                stats.cached_chunks,
                stats.evictions,
                stats.out_of_bounds,
                timer.average(),
                timer.max()
            );
        }
        Commands::Mesh {
            world,
            x,
            z,
            radius,
            threads,
        } => {
            let world = world.world()?;
            let mut queue = world.batched_mesh_queue(threads)?;
            let manager = world.manager();
            let center = ChunkCoord::from_world(x, z, manager.config().chunk_size);

            let mut tickets = Vec::new();
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let coord = center.offset(dx, dz);
                    tickets.push((coord, queue.submit(manager.mesh_job(coord))));
                }
            }
            let built = queue.flush();
            info!(built, %center, radius, "chunks meshed");
            println!("Meshed {built} chunks around {center}");

            let (mut vertices, mut triangles) = (0, 0);
            for (coord, ticket) in tickets {
                let Some(set) = queue.take(ticket) else {
                    continue;
                };
                println!(
                    "  {coord}: surface={} sidewalks={} markings={} triangles={}",
                    set.surface.vertex_count(),
                    set.sidewalks.vertex_count(),
                    set.markings.vertex_count(),
                    set.triangle_count()
                );
                vertices += set.vertex_count();
                triangles += set.triangle_count();
            }
            println!(
                "Total: vertices={vertices}, triangles={triangles}, vertex bytes={}",
                vertices * std::mem::size_of::<RoadVertex>()
            );
        }
    }

    Ok(())
}
