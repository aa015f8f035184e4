use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use threadprint::api;
use threadprint::assets::AssetLoader;
use threadprint::models::AppConfig;
use threadprint::server;
use threadprint::services::{load_catalog, BlueprintOptions, BlueprintService, ImageInput};

#[derive(Parser)]
#[command(name = "threadprint")]
#[command(about = "Threadprint - paint-by-number and embroidery blueprints from photos")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Generate a blueprint from an image file
    Blueprint {
        /// Input image (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file path
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the indexed preview PNG here
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Number of palette colors (1-256)
        #[arg(short, long)]
        palette_size: Option<usize>,

        /// Seed for centroid initialization
        #[arg(short, long)]
        seed: Option<i64>,

        /// Regions smaller than this many pixels are merged into a neighbor
        #[arg(long)]
        min_region_area: Option<usize>,

        /// Keep every region, however small
        #[arg(long)]
        no_merge: bool,

        /// Downscale so the longest side is at most this many pixels
        #[arg(long)]
        max_dimension: Option<usize>,
    },
    /// Find the DMC threads closest to a color
    Match {
        /// Color as #RRGGBB or RRGGBB
        hex: String,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract the DMC thread dataset
        #[arg(long)]
        threads: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Threadprint API",
        description = "Paint-by-number and embroidery blueprints from photos",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_register_image,
        api::handle_blueprint,
        api::handle_sample,
        api::handle_match_thread,
        api::handle_cache_stats,
    ),
    components(schemas(
        api::RegisterImageRequest,
        api::RegisterImageResponse,
        api::ImageRef,
        api::BlueprintRequest,
        api::BlueprintResponse,
        api::PaletteColorBody,
        api::RegionBody,
        api::BBoxBody,
        api::SampleRequest,
        api::SampleResponse,
        api::MatchThreadRequest,
        api::ThreadMatchBody,
        api::ThreadCandidateBody,
        api::CacheStatsResponse,
    )),
    tags(
        (name = "Images", description = "Image registration and cache"),
        (name = "Blueprint", description = "Blueprint generation and color sampling"),
        (name = "Threads", description = "DMC thread matching")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Blueprint {
            input,
            output,
            preview,
            palette_size,
            seed,
            min_region_area,
            no_merge,
            max_dimension,
        }) => run_blueprint_command(
            &input,
            &output,
            preview.as_deref(),
            BlueprintOptions {
                palette_size,
                seed,
                min_region_area,
                merge_small_regions: no_merge.then_some(false),
                include_preview: Some(preview.is_some()),
            },
            max_dimension,
        ),
        Some(Commands::Match { hex }) => run_match_command(&hex),
        Some(Commands::Init {
            config,
            threads,
            all,
            force,
            list,
        }) => run_init_command(config, threads, all, force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "threadprint=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Asset loader from CONFIG_FILE, with the dataset from THREADS_FILE or the config
fn asset_loader_from_env() -> (AssetLoader, AppConfig) {
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let threads_file = std::env::var("THREADS_FILE").ok().map(PathBuf::from);

    let loader = AssetLoader::new(config_file, None);
    let config = AppConfig::load_from_assets(&loader);
    let dataset = config.threads_dataset(threads_file);
    (loader.with_threads_file(dataset), config)
}

/// Generate a blueprint without starting the server
fn run_blueprint_command(
    input: &PathBuf,
    output: &PathBuf,
    preview: Option<&std::path::Path>,
    options: BlueprintOptions,
    max_dimension: Option<usize>,
) -> anyhow::Result<()> {
    init_cli_logging();

    let (loader, config) = asset_loader_from_env();
    let catalog = load_catalog(&loader).map(Arc::new);
    let service = BlueprintService::from_config(&config, catalog);

    let bytes = std::fs::read(input)?;
    let result = service
        .blueprint(
            &ImageInput::Encoded {
                bytes,
                max_dimension,
            },
            &options,
        )
        .map_err(|e| anyhow::anyhow!("Blueprint error: {e}"))?;

    let mut response = api::BlueprintResponse::from(&result);
    // the PNG goes to its own file instead of inline base64
    response.preview_png = None;
    std::fs::write(output, serde_json::to_vec_pretty(&response)?)?;
    println!(
        "Wrote {} ({}x{}, {} colors, {} regions)",
        output.display(),
        response.width,
        response.height,
        response.palette.len(),
        response.regions.len()
    );

    if let (Some(path), Some(png)) = (preview, result.preview_png.as_ref()) {
        std::fs::write(path, png)?;
        println!("Wrote {} ({} bytes)", path.display(), png.len());
    }

    Ok(())
}

/// Print the nearest DMC threads for a color
fn run_match_command(hex: &str) -> anyhow::Result<()> {
    use blueprint_engine::ColorQuery;

    init_cli_logging();

    let (loader, config) = asset_loader_from_env();
    let catalog = load_catalog(&loader).map(Arc::new);
    let service = BlueprintService::from_config(&config, catalog);

    let matched = service
        .match_color(&ColorQuery::hex(hex))
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!(
        "Best:  DMC {:<6} {:<32} {}  dE {:.2}",
        matched.best.thread.id, matched.best.thread.name, matched.best.thread.hex, matched.best.delta_e
    );
    for alt in &matched.alternatives {
        println!(
            "       DMC {:<6} {:<32} {}  dE {:.2}",
            alt.thread.id, alt.thread.name, alt.thread.hex, alt.delta_e
        );
    }

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(
    config: bool,
    threads: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    use threadprint::assets::AssetCategory;

    if list {
        println!("Embedded assets:\n");
        println!("Config:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        println!("\nThreads:");
        for f in AssetLoader::list_embedded(AssetCategory::Threads) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Determine which categories to extract
    let mut categories = Vec::new();
    if all || config {
        categories.push(AssetCategory::Config);
    }
    if all || threads {
        categories.push(AssetCategory::Threads);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --config, or --threads");
        eprintln!("\nRun 'threadprint init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let threads_file = std::env::var("THREADS_FILE").ok().map(PathBuf::from);
    let loader = AssetLoader::new(config_file, threads_file);

    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let threads_file = std::env::var("THREADS_FILE").ok();

    println!("Threadprint v{VERSION}");
    println!("Paint-by-number and embroidery blueprints from photos\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR    = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE  = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  THREADS_FILE = {}",
        threads_file.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let config_source = match config_file {
        Some(ref path) if PathBuf::from(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:  {config_source}");

    let (loader, config) = asset_loader_from_env();
    match load_catalog(&loader) {
        Some(catalog) => println!(
            "  Threads: {} ({} threads)",
            loader.threads_source(),
            catalog.len()
        ),
        None => println!("  Threads: {} (unavailable)", loader.threads_source()),
    }

    println!("\nDefaults:");
    println!(
        "  cache capacity {}, max dimension {}, palette size {}, seed {}",
        config.cache.capacity,
        config.cache.max_dimension,
        config.blueprint.palette_size,
        config.blueprint.seed
    );

    println!("\nCommands:");
    println!("  threadprint serve       Start the HTTP server");
    println!("  threadprint blueprint   Generate a blueprint from an image file");
    println!("  threadprint match       Find the closest DMC threads for a color");
    println!("  threadprint init        Extract embedded assets");
    println!("\nRun 'threadprint --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "threadprint=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let threads_file = std::env::var("THREADS_FILE").ok().map(PathBuf::from);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        config = ?config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        threads = ?threads_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "config or embedded".to_string()),
        "Asset sources configured"
    );

    let state = server::create_app_state(AssetLoader::new(config_file, threads_file))?;

    // OpenAPI documentation (production only)
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Threadprint server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
