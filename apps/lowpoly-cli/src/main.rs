mod config;
mod scene;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lowpoly_assets::TextureTable;
use lowpoly_input::{InputMapper, InputSource};
use lowpoly_kernel::{World, WorldEvent};
use lowpoly_render::{
    DebugTextRenderer, DrawRecorder, FrameStats, HeadlessPresenter, OrderingTable, Rasterizer,
    overlay_text, render_frame,
};
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::scene::{DEFAULT_TEXTURES, build_demo, demo_script};

#[derive(Parser)]
#[command(name = "lowpoly-cli", about = "Headless runner for the lowpoly demo scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Print the effective configuration as YAML
    Config {
        /// YAML config file; defaults apply to anything it omits
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Simulate and render the demo scene headlessly
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "300")]
        ticks: u64,
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON texture manifest; the built-in placement is used otherwise
        #[arg(long)]
        textures: Option<PathBuf>,
        /// Hold the left stick forward for the whole run
        #[arg(short, long)]
        walk: bool,
        /// Press jump once every K ticks
        #[arg(short, long)]
        jump_every: Option<u32>,
        /// Seed for the flat-shaded face colours
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print the last frame's draw list
        #[arg(long)]
        dump: bool,
    },
}

struct RunArgs {
    ticks: u64,
    config: Option<PathBuf>,
    textures: Option<PathBuf>,
    walk: bool,
    jump_every: Option<u32>,
    seed: u64,
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("lowpoly-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("gte: {}", lowpoly_gte::crate_info());
            println!("ecs: {}", lowpoly_ecs::crate_info());
            println!("input: {}", lowpoly_input::crate_info());
            println!("kernel: {}", lowpoly_kernel::crate_info());
            println!("render: {}", lowpoly_render::crate_info());
        }
        Commands::Config { config } => {
            let cfg = EngineConfig::load_or_default(config.as_deref())?;
            print!("{}", cfg.to_yaml()?);
        }
        Commands::Run {
            ticks,
            config,
            textures,
            walk,
            jump_every,
            seed,
            dump,
        } => run(RunArgs {
            ticks,
            config,
            textures,
            walk,
            jump_every,
            seed,
            dump,
        })?,
    }

    Ok(())
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = EngineConfig::load_or_default(args.config.as_deref())?;
    let textures = match &args.textures {
        Some(path) => TextureTable::load_manifest(path)?,
        None => TextureTable::from_json_str(DEFAULT_TEXTURES)?,
    };
    let gte = cfg.gte;

    let mut world = World::new(cfg.sim.clone());
    let scene = build_demo(&mut world, &textures, args.seed, &gte)?;
    let mut input = demo_script(args.walk, args.jump_every);
    let mut mapper = InputMapper::new(cfg.input.clone());

    let mut table = OrderingTable::new(cfg.render.table_size)?;
    let mut recorder = DrawRecorder::new();
    let mut presenter = HeadlessPresenter::new();
    let mut totals = FrameStats::default();
    let mut last = FrameStats::default();

    println!(
        "Running demo: ticks={}, walk={}, jump_every={:?}, entities={}, solids={}",
        args.ticks,
        args.walk,
        args.jump_every,
        world.entity_count(),
        scene.solids.len()
    );

    let (mut jumps, mut steps) = (0, 0);
    for _ in 0..args.ticks {
        let intent = mapper.map(&input.poll());
        world.step(intent, &gte);
        for event in world.drain_events() {
            match event {
                WorldEvent::Jumped { .. } => jumps += 1,
                WorldEvent::LedgeStep { .. } => steps += 1,
                _ => {}
            }
            tracing::debug!(?event, "world event");
        }

        let overlay = overlay_text(&world, &last);
        recorder.begin_frame();
        last = render_frame(
            &world,
            &gte,
            &cfg.render,
            &mut table,
            &mut recorder,
            &mut presenter,
            &overlay,
        );
        totals += last;
    }

    println!(
        "Frames: {} presented, {} drawn, {} culled, {} out of range",
        presenter.frames(),
        totals.drawn,
        totals.culled,
        totals.out_of_range
    );
    println!("Jumps: {jumps}, ledge steps: {steps}");
    if let Some(player) = world.entity(scene.player) {
        let p = player.transform.grid_position();
        println!("Player: {}, {}, {}", p.x, p.y, p.z);
    }
    if let Some(cube) = world.entity(scene.cube) {
        let r = cube.transform.rotation();
        println!("Cube rotation: {}, {}, {} (spinning={})", r.x, r.y, r.z, world.is_spinning());
    }
    println!("State hash: {:#018x}", world.state_hash());

    if args.dump {
        let mut text = DebugTextRenderer::new();
        for prim in recorder.frame() {
            text.draw(prim);
        }
        println!("Last frame ({} primitives):", text.lines());
        print!("{}", text.take());
        print!("{}", presenter.overlay());
    }

    Ok(())
}
