use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use mascot_studio::api::{GeminiClient, RetryPolicy};
use mascot_studio::brand::{BrandId, ChannelRegistry, ChannelType, FileStore};
use mascot_studio::config::{resolve_api_key, StudioConfig};
use mascot_studio::content::{ContentService, Models, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use mascot_studio::package::PackageExporter;
use mascot_studio::prompt::catalog::{COMIC_IMAGE_STYLES, HUMANIZATION_STYLES, TONES};
use mascot_studio::prompt::{
    AspectRatio, AssetKit, HookConfig, ImageApplication, ImageConfig, ReferenceImage, ScriptBrief,
};
use mascot_studio::scene::{AudioClip, ContentType};
use mascot_studio::studio::{CancelFlag, CreationContext, ImageRunOutcome, Studio, StudioEvent};

#[derive(Parser, Debug)]
#[command(name = "mascot-studio")]
#[command(about = "Mascot content studio: scripts, storyboards and packages via Gemini", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Gemini API key (falls back to GEMINI_API_KEY, then API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[arg(long, global = true, env = "STUDIO_TEXT_MODEL", default_value = DEFAULT_TEXT_MODEL)]
    text_model: String,

    #[arg(long, global = true, env = "STUDIO_IMAGE_MODEL", default_value = DEFAULT_IMAGE_MODEL)]
    image_model: String,

    /// Attempts per remote call for transient failures
    #[arg(long, global = true, default_value_t = 3)]
    retries: u32,

    #[arg(long, global = true, default_value_t = 2000)]
    retry_delay_ms: u64,

    #[arg(long, global = true, default_value_t = 300)]
    timeout_secs: u64,

    /// Directory holding persisted settings (channel list)
    #[arg(long, global = true, default_value = "./studio-data")]
    data_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a script, its images, and export the package
    Generate(GenerateArgs),
    /// Manage distribution channels
    Channels {
        #[command(subcommand)]
        action: ChannelAction,
    },
    /// Show the brand packs
    Brands,
}

#[derive(Subcommand, Debug)]
enum ChannelAction {
    List {
        #[arg(long)]
        brand: Option<BrandId>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        kind: ChannelType,
        #[arg(long)]
        brand: BrandId,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Idea or trend the content is built around
    #[arg(short, long)]
    trend: String,

    /// Main ad script (required for video, film and social)
    #[arg(short, long, default_value = "")]
    script: String,

    #[arg(long = "type", default_value = "video")]
    content_type: ContentType,

    /// Posts, stickers or panels to produce
    #[arg(short = 'n', long, default_value_t = 3)]
    count: u32,

    /// Video hook length in seconds
    #[arg(long, default_value_t = 15)]
    length: u32,

    /// Film length in seconds
    #[arg(long, default_value_t = 60)]
    film_length: u32,

    #[arg(long)]
    mascot: PathBuf,

    #[arg(long)]
    product: Option<PathBuf>,

    #[arg(long)]
    supporting: Option<PathBuf>,

    #[arg(long, default_value = "oniiz")]
    brand: BrandId,

    /// Channel id; defaults to the brand's first channel
    #[arg(long)]
    channel: Option<String>,

    #[arg(long, default_value = TONES[0])]
    tone: String,

    #[arg(long, default_value = "pov")]
    hook_style: String,

    #[arg(long, default_value = HUMANIZATION_STYLES[0])]
    humanization_style: String,

    #[arg(long, default_value = "")]
    persona: String,

    /// Humanize passes to run before generating images
    #[arg(long, default_value_t = 0)]
    humanize: u32,

    /// Image application; defaults per content type
    #[arg(long)]
    application: Option<ImageApplication>,

    #[arg(long, default_value = "9:16")]
    aspect_ratio: AspectRatio,

    /// Art style for comic panels
    #[arg(long, default_value = COMIC_IMAGE_STYLES[0])]
    art_style: String,

    /// Scene duration override, SCENE=SECONDS (video and film)
    #[arg(long = "duration", value_parser = parse_scene_value::<f64>)]
    durations: Vec<(usize, f64)>,

    /// Voice-over for a scene, SCENE=PATH
    #[arg(long = "audio", value_parser = parse_scene_value::<PathBuf>)]
    audio: Vec<(usize, PathBuf)>,

    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Stop after the script and write it as script.json
    #[arg(long)]
    skip_images: bool,
}

/// Parses `N=value` with a 1-based scene number.
fn parse_scene_value<T>(raw: &str) -> Result<(usize, T), String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let (scene, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SCENE=VALUE, got '{raw}'"))?;
    let scene: usize = scene
        .trim()
        .parse()
        .map_err(|e| format!("invalid scene number '{scene}': {e}"))?;
    if scene == 0 {
        return Err("scene numbers start at 1".to_string());
    }
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value '{value}': {e}"))?;
    Ok((scene - 1, value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => run_generation(&cli.global, args).await,
        Command::Channels { action } => run_channels(&cli.global, action),
        Command::Brands => {
            print_brands();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn build_config(global: &GlobalArgs) -> anyhow::Result<StudioConfig> {
    let api_key = resolve_api_key(global.api_key.clone())?;
    let mut config = StudioConfig::new(api_key);
    config.models = Models {
        text: global.text_model.clone(),
        image: global.image_model.clone(),
    };
    config.retry = RetryPolicy::new(global.retries, Duration::from_millis(global.retry_delay_ms));
    config.request_timeout = Duration::from_secs(global.timeout_secs);
    config.data_dir = global.data_dir.clone();
    Ok(config)
}

async fn load_assets(args: &GenerateArgs) -> anyhow::Result<AssetKit> {
    async fn load(path: &Path) -> anyhow::Result<ReferenceImage> {
        ReferenceImage::from_path(path)
            .await
            .with_context(|| format!("Failed to read image: {}", path.display()))
    }

    let mut assets = AssetKit {
        mascot: Some(load(&args.mascot).await?),
        ..AssetKit::default()
    };
    if let Some(path) = &args.product {
        assets.product = Some(load(path).await?);
    }
    if let Some(path) = &args.supporting {
        assets.supporting_character = Some(load(path).await?);
    }
    Ok(assets)
}

fn creation_context(config: &StudioConfig, args: &GenerateArgs) -> anyhow::Result<CreationContext> {
    let registry = ChannelRegistry::open(FileStore::new(&config.data_dir));
    let channel = match &args.channel {
        Some(id) => registry
            .get(id)
            .filter(|c| c.brand == args.brand)
            .ok_or_else(|| anyhow!("Channel '{}' not found for brand {}", id, args.brand))?,
        None => registry
            .for_brand(args.brand)
            .next()
            .ok_or_else(|| anyhow!("Brand {} has no channels; add one first", args.brand))?,
    };
    info!("Creating for {} / {} ({})", args.brand.pack().name, channel.name, channel.kind);
    Ok(CreationContext::new(args.brand, channel.id.as_str()))
}

fn spawn_event_logger() -> mpsc::UnboundedSender<StudioEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                StudioEvent::Status(message) => info!("{}", message),
                StudioEvent::ImageStarted { index, total } => {
                    info!("Rendering image {}/{}", index + 1, total)
                }
                StudioEvent::ImageReady { index } => info!("Image {} ready", index + 1),
                StudioEvent::Finalized { id } => info!("Item {} finalized", id),
            }
        }
    });
    tx
}

async fn write_script_json(
    output_dir: &Path,
    scenes: &[mascot_studio::scene::ScriptScene],
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .context("Failed to create output directory")?;
    let path = output_dir.join("script.json");
    let json = serde_json::to_string_pretty(&serde_json::json!({ "scenes": scenes }))?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

async fn run_generation(global: &GlobalArgs, args: GenerateArgs) -> anyhow::Result<()> {
    let config = build_config(global)?;
    let context = creation_context(&config, &args)?;

    // 1. Client, services and the studio
    let client = GeminiClient::new(config.api_key.clone(), config.request_timeout)?
        .with_base_url(config.api_base.as_str());
    let content = ContentService::new(client, config.retry, config.models.clone());
    let mut studio = Studio::new(content).with_events(spawn_event_logger());

    studio.set_assets(load_assets(&args).await?);
    studio.set_image_config(ImageConfig {
        application: args
            .application
            .unwrap_or_else(|| ImageApplication::for_content(args.content_type)),
        aspect_ratio: args.aspect_ratio,
        style: Some(args.art_style.clone()),
    });

    // 2. Script and score
    let brief = ScriptBrief {
        content_type: args.content_type,
        trend_idea: args.trend.clone(),
        secondary_script: args.script.clone(),
        hook: HookConfig {
            style: args.hook_style.clone(),
            tone: args.tone.clone(),
            length: args.length,
        },
        humanization_style: args.humanization_style.clone(),
        persona: args.persona.clone(),
        post_count: args.count,
        film_length: args.film_length,
    };

    let item = studio.generate_script(&brief, Some(&context)).await?;
    info!("Script ready: {} scenes, score {}/100", item.len(), item.score().score);
    info!("Feedback: {}", item.score().feedback);

    // 3. Optional humanize passes
    for pass in 1..=args.humanize {
        let item = studio
            .humanize(&brief.humanization_style, &brief.persona)
            .await?;
        info!("Humanize pass {}: score {}/100", pass, item.score().score);
    }

    // 4. Per-scene edits
    for (index, seconds) in &args.durations {
        studio.set_scene_duration(*index, *seconds)?;
    }
    if !args.audio.is_empty() {
        let buffer_dir = args.output_dir.join("recordings");
        tokio::fs::create_dir_all(&buffer_dir).await?;
        for (index, source) in &args.audio {
            let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("webm");
            let buffer = buffer_dir.join(format!("scene_{}.{}", index + 1, ext));
            tokio::fs::copy(source, &buffer)
                .await
                .with_context(|| format!("Failed to read recording: {}", source.display()))?;
            studio.add_audio(*index, AudioClip::new(buffer)).await?;
        }
    }

    if args.skip_images {
        let scenes = studio
            .work_in_progress()
            .map(|item| item.scenes().to_vec())
            .unwrap_or_default();
        let path = write_script_json(&args.output_dir, &scenes).await?;
        info!("Skipped image generation, script written to {}", path.display());
        studio.discard().await;
        return Ok(());
    }

    // 5. Images, one scene at a time
    let cancel = CancelFlag::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current image");
            ctrl_c.cancel();
        }
    });

    match studio.generate_all_images(&cancel).await? {
        ImageRunOutcome::Finalized(id) => {
            // 6. Package
            let item = studio
                .library()
                .get(&id)
                .ok_or_else(|| anyhow!("Finalized item {} missing from library", id))?;
            info!("Total duration: {:.1}s", item.total_duration());
            let path = PackageExporter::new(&args.output_dir).export(item).await?;
            info!("Package ready: {}", path.display());
        }
        ImageRunOutcome::Cancelled { remaining } => {
            let scenes = studio
                .work_in_progress()
                .map(|item| item.scenes().to_vec())
                .unwrap_or_default();
            let path = write_script_json(&args.output_dir, &scenes).await?;
            warn!(
                "Cancelled with {} images left; script saved to {}",
                remaining,
                path.display()
            );
            studio.discard().await;
        }
    }

    Ok(())
}

fn run_channels(global: &GlobalArgs, action: ChannelAction) -> anyhow::Result<()> {
    let mut registry = ChannelRegistry::open(FileStore::new(&global.data_dir));
    match action {
        ChannelAction::List { brand } => {
            for brand in BrandId::ALL.into_iter().filter(|b| brand.map_or(true, |f| f == *b)) {
                println!("{}", brand.pack().name);
                for channel in registry.for_brand(brand) {
                    println!("  [{}] {} ({})", channel.id, channel.name, channel.kind);
                }
            }
        }
        ChannelAction::Add { name, kind, brand } => {
            let channel = registry.add(&name, kind, brand)?;
            println!("Added [{}] {} ({}) to {}", channel.id, channel.name, channel.kind, brand.pack().name);
        }
    }
    Ok(())
}

fn print_brands() {
    for brand in BrandId::ALL {
        let pack = brand.pack();
        println!("{} ({})", pack.name, brand);
        println!(
            "  palette: {} {} {} {}",
            pack.palette.primary, pack.palette.secondary, pack.palette.navy, pack.palette.white
        );
        println!("  fonts: {} / {}", pack.fonts.heading, pack.fonts.body);
        println!("  taglines: {}", pack.taglines.join(" | "));
        for cta in pack.call_to_action {
            println!("  cta: {}", cta);
        }
    }
}
