mod script;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use perch_ar::ArController;
use perch_base::{ControllerConfig, SessionId};
use perch_io::{AssetSource, LoaderRegistry};
use perch_scene::{LoadedScene, SceneNormalizer};
use script::{ScriptedBackend, SimulationScript};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "perch")]
#[command(about = "AR placement controller toolkit")]
struct Cli {
    /// Controller settings as JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a model and list what selection can correlate.
    Inspect(InspectArgs),
    /// Replay a scripted AR session against a model.
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct InspectArgs {
    model: PathBuf,
}

#[derive(Args)]
struct SimulateArgs {
    model: PathBuf,
    #[arg(long)]
    script: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Inspect(args) => inspect(args, &config),
        Command::Simulate(args) => simulate(args, config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ControllerConfig> {
    match path {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display())),
        None => Ok(ControllerConfig::default()),
    }
}

fn load_model(path: &Path) -> Result<LoadedScene> {
    let registry = LoaderRegistry::with_defaults();
    registry
        .load(&AssetSource::Path(path.to_path_buf()))
        .with_context(|| format!("failed to load {}", path.display()))
}

fn inspect(args: InspectArgs, config: &ControllerConfig) -> Result<()> {
    let scene = load_model(&args.model)?;
    let Some(asset) = SceneNormalizer::new(config.canonical_size).normalize(scene) else {
        bail!("{} contains no scene graph", args.model.display());
    };

    println!("asset    {}", asset.id());
    println!("scale    {:.6}", asset.normalized_scale());
    match asset.graph().bounds() {
        Some(bounds) => {
            let size = bounds.size();
            println!("size     {:.4} x {:.4} x {:.4}", size.x, size.y, size.z);
        }
        None => println!("size     empty"),
    }

    println!("meshes   {}", asset.meshes().len());
    for index in 0..asset.meshes().len() {
        let name = asset
            .mesh_node(index)
            .map(|node| node.name.as_str())
            .unwrap_or_default();
        let clip = asset
            .clip_index_by_name(name)
            .map(|clip| format!(" -> clip {clip}"))
            .unwrap_or_default();
        println!("  [{index}] {name}{clip}");
    }

    println!("audio    {}", asset.audio_emitters().len());
    for (index, &node) in asset.audio_emitters().iter().enumerate() {
        let uri = asset
            .graph()
            .node(node)
            .and_then(|node| node.as_audio())
            .map(|source| source.uri.as_str())
            .unwrap_or_default();
        println!("  [{index}] {uri}");
    }

    println!("clips    {}", asset.clips().len());
    for (index, clip) in asset.clips().iter().enumerate() {
        println!("  [{index}] {} ({:.3}s)", clip.name, clip.duration);
    }
    Ok(())
}

fn simulate(args: SimulateArgs, config: ControllerConfig) -> Result<()> {
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let script: SimulationScript =
        serde_json::from_str(&text).context("failed to parse simulation script")?;
    let scene = load_model(&args.model)?;

    let mut controller =
        ArController::new(ScriptedBackend::new(script.hit_test_supported), config)?;
    if controller.load_asset(scene).is_none() {
        bail!("{} contains no scene graph", args.model.display());
    }
    controller
        .begin_session(SessionId(script.session))
        .context("failed to start AR session")?;

    script::play(script.frames, &mut controller)?;

    info!(
        live_sources = controller.backend().live_sources(),
        "simulation finished"
    );
    let panel = serde_json::to_string_pretty(&controller.panel())?;
    println!("{panel}");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
