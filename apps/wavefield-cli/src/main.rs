mod config;
mod sim;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wavefield_kernel::WaveField;
use wavefield_render::{Renderer, TextRenderer};

use crate::config::SimConfig;
use crate::sim::{HeightExport, Simulation};

#[derive(Parser)]
#[command(name = "wavefield-cli", about = "Damped wave height-field simulator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print parameters, derived coefficients and stability
    Info {
        /// YAML or JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the simulation with random ripples
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "300")]
        frames: u64,
        /// Seconds of simulated time per frame (overrides config)
        #[arg(long)]
        frame_dt: Option<f32>,
        /// Ripple RNG seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML or JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print an ASCII height map of the final frame
        #[arg(short, long)]
        render: bool,
        /// Sample every n-th vertex when rendering
        #[arg(long, default_value = "4")]
        stride: usize,
        /// Write final heights as JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// Record a run, rebuild it from its event log and compare
    Replay {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Ripple RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info { config } => {
            let config = SimConfig::resolve(config.as_deref())?;
            let field = WaveField::new(config.wave)?;
            let params = field.params();
            let k = field.coefficients();

            println!("wavefield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "grid: {}x{} vertices, {} triangles",
                field.row_count(),
                field.column_count(),
                field.triangle_count()
            );
            println!(
                "extent: {:.3} x {:.3}, spatial step {:.4}",
                field.width(),
                field.depth(),
                field.spatial_step()
            );
            println!(
                "time step {}, wave speed {}, damping {}",
                params.time_step, params.wave_speed, params.damping
            );
            println!("coefficients: k1={:.6} k2={:.6} k3={:.6}", k.k1, k.k2, k.k3);
            println!(
                "courant number {:.4} ({})",
                params.courant_number(),
                if params.is_stable() { "stable" } else { "UNSTABLE" }
            );
        }
        Commands::Run {
            frames,
            frame_dt,
            seed,
            config,
            render,
            stride,
            export,
        } => {
            let mut config = SimConfig::resolve(config.as_deref())?;
            if let Some(dt) = frame_dt {
                config.frame_dt = dt;
            }
            if let Some(seed) = seed {
                config.ripple.seed = seed;
            }

            let mut sim = Simulation::new(&config)?;
            let span = tracing::info_span!("run", frames, seed = config.ripple.seed);
            let _guard = span.enter();

            let report_every = (frames / 10).max(1);
            for frame in 1..=frames {
                sim.frame(config.frame_dt)?;
                if frame % report_every == 0 {
                    tracing::info!(
                        frame,
                        steps = sim.field().steps(),
                        ripples = sim.ripples_fired(),
                        max_height = sim.field().max_abs_height(),
                        "progress"
                    );
                }
            }

            println!(
                "Run: frames={frames}, steps={}, ripples={}, hash={:#x}",
                sim.field().steps(),
                sim.ripples_fired(),
                sim.field().state_hash()
            );
            println!(
                "Mesh: {} vertices, {} triangles, {} bytes",
                sim.mesh().vertices().len(),
                sim.mesh().triangle_count(),
                sim.mesh().vertex_bytes().len()
            );

            if render {
                print!("{}", TextRenderer::new().with_stride(stride).render(sim.field()));
            }
            if let Some(path) = export {
                HeightExport::of(sim.field()).write(&path)?;
                println!("Exported heights to {}", path.display());
            }
        }
        Commands::Replay { frames, seed } => {
            println!("Deterministic replay: seed={seed}, frames={frames}");

            let mut config = SimConfig::default();
            config.ripple.seed = seed;

            // Run 1
            let mut sim = Simulation::new(&config)?.recording();
            for _ in 0..frames {
                sim.frame(config.frame_dt)?;
            }

            // Replay from events
            let replayed = WaveField::replay(config.wave, sim.events())?;

            let recorded = sim.field().state_hash();
            let rebuilt = replayed.state_hash();
            println!(
                "Run 1: steps={}, events={}, hash={recorded:#x}",
                sim.field().steps(),
                sim.events().len()
            );
            println!("Replay: steps={}, hash={rebuilt:#x}", replayed.steps());
            println!(
                "Match: {}",
                if recorded == rebuilt { "OK" } else { "MISMATCH" }
            );
        }
    }

    Ok(())
}
