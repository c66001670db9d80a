mod build_tools;
mod scene_tools;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use scenewright_build::AssemblyOptions;
use scenewright_core::{FollowMode, ResolutionPolicy, SceneConfig, CONFIG_FILE_NAME};
use scenewright_ir::{validate_manifest, AssetId};
use scenewright_plan::{compose, Planner, SceneIntent, SceneType};

#[derive(Parser)]
#[command(
    name = "scenewright",
    version,
    about = "SceneWright — declarative 3D scene assembly",
    long_about = "SceneWright turns scene intents into manifests, and manifests into\nreproducible 3D scenes.\n\nPlan once. Rebuild anywhere."
)]
struct Cli {
    /// Config file (default: scenewright.toml in the working directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a scene manifest from an intent
    Plan {
        /// Scene template: static_scene, move_actor or carry_object
        #[arg(required_unless_present = "intent")]
        scene_type: Option<String>,

        /// Read the whole intent from a JSON file instead
        #[arg(long, conflicts_with = "scene_type")]
        intent: Option<PathBuf>,

        #[arg(long, default_value = "kid")]
        actor: String,

        #[arg(long, default_value = "ball")]
        object: String,

        #[arg(long, default_value = "court")]
        environment: String,

        /// Override the configured scene id
        #[arg(long)]
        scene_id: Option<String>,

        /// Output directory (default: [paths].manifests_dir)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Print the manifest instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Compose a manifest from a hand-written scene spec
    Compose {
        /// Path to the scene spec JSON
        #[arg()]
        spec: PathBuf,

        /// Directory holding asset descriptors, and where the manifest is written
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Print the manifest instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Validate a scene manifest
    Check {
        /// Path to the .scene.json file
        #[arg()]
        file: PathBuf,
    },

    /// Print a manifest's structure and content hash
    Inspect {
        /// Path to the .scene.json file
        #[arg()]
        file: PathBuf,
    },

    /// Import, normalize and describe assets, storing their descriptors
    Ingest {
        /// Asset ids to ingest
        #[arg(required = true)]
        assets: Vec<String>,

        /// Prefab library JSON standing in for the asset files
        #[arg(long)]
        library: PathBuf,

        /// Descriptor directory (default: [paths].manifests_dir)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Rebuild a scene from its manifest into the in-memory scene graph
    Rebuild {
        /// Path to the .scene.json file
        #[arg()]
        file: PathBuf,

        /// Prefab library JSON standing in for the asset files
        #[arg(long)]
        library: PathBuf,

        /// Skip unresolvable assets instead of failing
        #[arg(long)]
        best_effort: bool,

        /// How follow links are realized (default: [assembly].follow)
        #[arg(long, value_enum)]
        follow: Option<FollowArg>,

        /// Print the rebuilt scene as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version and pipeline info
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum FollowArg {
    Continuous,
    Snapshot,
}

impl From<FollowArg> for FollowMode {
    fn from(arg: FollowArg) -> Self {
        match arg {
            FollowArg::Continuous => FollowMode::Continuous,
            FollowArg::Snapshot => FollowMode::Snapshot,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries manifests and JSON; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = SceneConfig::discover(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Commands::Plan {
            scene_type,
            intent,
            actor,
            object,
            environment,
            scene_id,
            out_dir,
            stdout,
        } => {
            let intent = match (intent, scene_type) {
                (Some(path), _) => scene_tools::read_intent(&path)?,
                (None, Some(scene_type)) => SceneIntent::new(scene_type, actor, object, environment),
                (None, None) => anyhow::bail!("either a scene type or --intent is required"),
            };
            cmd_plan(&config, intent, scene_id, out_dir, stdout)
        }
        Commands::Compose {
            spec,
            out_dir,
            stdout,
        } => cmd_compose(&config, spec, out_dir, stdout),
        Commands::Check { file } => cmd_check(file),
        Commands::Inspect { file } => cmd_inspect(file),
        Commands::Ingest {
            assets,
            library,
            out_dir,
        } => cmd_ingest(&config, assets, library, out_dir),
        Commands::Rebuild {
            file,
            library,
            best_effort,
            follow,
            json,
        } => {
            let mut options = AssemblyOptions::from(&config.assembly);
            if best_effort {
                options.resolution = ResolutionPolicy::BestEffort;
            }
            if let Some(follow) = follow {
                options.follow = follow.into();
            }
            cmd_rebuild(&config, file, library, options, json)
        }
        Commands::Info => cmd_info(&config),
    }
}

fn cmd_plan(
    config: &SceneConfig,
    intent: SceneIntent,
    scene_id: Option<String>,
    out_dir: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let mut planner = Planner::from_config(&config.planner);
    if let Some(id) = scene_id {
        planner = planner.with_scene_id(id);
    }
    let manifest = planner
        .plan(&intent)
        .with_context(|| format!("failed to plan '{}' scene", intent.scene_type))?;

    let store = scene_tools::store_for(config, out_dir);
    if let Some(path) = scene_tools::emit_manifest(&manifest, &store, stdout)? {
        println!("📝 Planned {} → {}", intent.scene_type, path.display());
        println!("   # {}", manifest.content_hash()?);
    }
    Ok(())
}

fn cmd_compose(
    config: &SceneConfig,
    spec: PathBuf,
    out_dir: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let spec_data = scene_tools::read_spec(&spec)?;
    let store = scene_tools::store_for(config, out_dir);
    let manifest = compose(&spec_data, &store)
        .with_context(|| format!("failed to compose {}", spec.display()))?;

    if let Some(path) = scene_tools::emit_manifest(&manifest, &store, stdout)? {
        println!("📝 Composed {} → {}", spec.display(), path.display());
    }
    Ok(())
}

fn cmd_check(file: PathBuf) -> Result<()> {
    println!("🔍 Checking {}", file.display());

    let manifest = scene_tools::read_manifest(&file)?;
    println!("   ✓ Parse OK");

    if let Err(err) = validate_manifest(&manifest) {
        anyhow::bail!("validation failed at {}: {}", err.field(), err);
    }
    println!("   ✓ Validate OK");

    println!();
    println!("   ✅ No errors found.");
    Ok(())
}

fn cmd_inspect(file: PathBuf) -> Result<()> {
    let manifest = scene_tools::read_manifest(&file)?;
    print!("{}", scene_tools::render_manifest_tree(&manifest)?);
    Ok(())
}

fn cmd_ingest(
    config: &SceneConfig,
    assets: Vec<String>,
    library: PathBuf,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let library = build_tools::load_library(&library)?;
    let store = scene_tools::store_for(config, out_dir);
    let ids: Vec<AssetId> = assets.into_iter().map(AssetId::new).collect();

    for report in build_tools::ingest_assets(config, &library, &ids, &store)? {
        let d = &report.descriptor;
        let height = d
            .height
            .map(|h| format!("{:.3}", h))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "📦 {} → {} ({} meshes, height {}){}",
            d.asset_id,
            d.root_object_name,
            d.mesh_count,
            height,
            if d.is_degenerate() { " ⚠️ degenerate" } else { "" }
        );
    }
    Ok(())
}

fn cmd_rebuild(
    config: &SceneConfig,
    file: PathBuf,
    library: PathBuf,
    options: AssemblyOptions,
    json: bool,
) -> Result<()> {
    let manifest = scene_tools::read_manifest(&file)?;
    let library = build_tools::load_library(&library)?;
    let store = scene_tools::store_for(config, None);
    let (graph, handle) = build_tools::rebuild(config, &manifest, library, options, &store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&graph.snapshot())?);
        return Ok(());
    }

    println!(
        "🎬 Rebuilt {} (frames {}..={})",
        handle.scene_id, handle.frame_start, handle.frame_end
    );
    println!("   Roots:   {}", handle.roots.len());
    println!("   Nodes:   {}", graph.len());
    for failure in &handle.failures {
        println!("   ⚠️  skipped {}: {}", failure.asset_id, failure.reason);
    }
    if handle.skipped_directives > 0 {
        println!("   ⚠️  {} directives skipped", handle.skipped_directives);
    }
    Ok(())
}

fn cmd_info(config: &SceneConfig) -> Result<()> {
    println!("🎬 SceneWright");
    println!("   Version:    {}", env!("CARGO_PKG_VERSION"));
    println!("   Config:     {}", CONFIG_FILE_NAME);
    println!("   Assets:     {}", config.paths.assets_root.display());
    println!("   Manifests:  {}", config.paths.manifests_dir.display());
    println!(
        "   Templates:  {}",
        SceneType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "   Assembly:   {} resolution, {} follow",
        config.assembly.resolution, config.assembly.follow
    );
    Ok(())
}
