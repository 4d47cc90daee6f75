use afterglow_common::{PointerPosition, Viewport};
use afterglow_render::{DebugTextRenderer, Renderer};
use afterglow_scene::{Animator, CUBE_COUNT, SceneConfig};
use afterglow_tools::SceneInspector;
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "afterglow-cli", about = "Headless tool for the afterglow scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SceneArgs {
    /// YAML scene configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for cube placement (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and scene defaults
    Info,
    /// Advance the animator headlessly and print the final frame
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,
        /// Number of frames to advance
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Pointer position "X,Y" in logical pixels, set before the first frame
        #[arg(long, value_parser = parse_pointer)]
        pointer: Option<PointerPosition>,
        /// Viewport width in logical pixels
        #[arg(long, default_value = "1280")]
        width: f32,
        /// Viewport height in logical pixels
        #[arg(long, default_value = "720")]
        height: f32,
        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        pixel_ratio: f32,
        /// How many cubes to list
        #[arg(long, default_value = "5")]
        cubes: usize,
    },
    /// Print every generated cube
    Dump {
        #[command(flatten)]
        scene: SceneArgs,
        #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
        format: DumpFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DumpFormat {
    Text,
    Json,
}

fn parse_pointer(s: &str) -> Result<PointerPosition, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(PointerPosition::new(x, y))
}

fn load_config(args: &SceneArgs) -> anyhow::Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let defaults = SceneConfig::default();
            println!("afterglow-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", afterglow_scene::crate_info());
            println!("render: {}", afterglow_render::crate_info());
            println!("cubes: {CUBE_COUNT}");
            println!(
                "post: afterimage damp={} bloom threshold={} strength={} radius={} exposure={}",
                defaults.afterimage_damp,
                defaults.bloom.threshold,
                defaults.bloom.strength,
                defaults.bloom.radius,
                defaults.exposure
            );
            println!(
                "orbit: distance [{}, {}] damping={}",
                defaults.orbit.min_distance,
                defaults.orbit.max_distance,
                defaults.orbit.damping_factor
            );
        }
        Commands::Simulate {
            scene,
            frames,
            pointer,
            width,
            height,
            pixel_ratio,
            cubes,
        } => {
            let config = load_config(&scene)?;
            let viewport = Viewport::new(width, height, pixel_ratio);
            let mut animator = Animator::init(viewport, &config);
            if let Some(p) = pointer {
                animator.on_pointer_move(p);
            }
            for _ in 0..frames {
                animator.frame();
            }
            tracing::debug!("simulated {frames} frames");

            print!("{}", DebugTextRenderer::with_max_cubes(cubes).render(&animator));
            println!("{}", SceneInspector::summary(&animator));
        }
        Commands::Dump { scene, format } => {
            let config = load_config(&scene)?;
            let animator = Animator::init(Viewport::default(), &config);
            match format {
                DumpFormat::Text => {
                    println!("{}", SceneInspector::summary(&animator));
                    for cube in SceneInspector::cubes(animator.scene()) {
                        println!("{cube}");
                    }
                }
                DumpFormat::Json => {
                    let json = serde_json::to_string_pretty(animator.scene())?;
                    println!("{json}");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_parses() {
        assert_eq!(
            parse_pointer("12.5, -3").unwrap(),
            PointerPosition::new(12.5, -3.0)
        );
    }

    #[test]
    fn pointer_rejects_garbage() {
        assert!(parse_pointer("12").is_err());
        assert!(parse_pointer("a,b").is_err());
    }

    #[test]
    fn seed_flag_overrides_config() {
        let args = SceneArgs {
            config: None,
            seed: Some(5),
        };
        assert_eq!(load_config(&args).unwrap().seed, Some(5));
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
