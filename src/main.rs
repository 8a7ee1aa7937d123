use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epaper_tools::models::{BuildContext, ToolsConfig};
use epaper_tools::rendering::{Ditherer, Probe, RasterJob, Rasterizer};
use epaper_tools::services::{self, HtmlOutcome, SystemGit};

#[derive(Parser)]
#[command(name = "epaper-tools")]
#[command(about = "Build-time asset tooling for tri-color e-paper firmware")]
struct Cli {
    /// Configuration file
    #[arg(
        long,
        global = true,
        env = "EPAPER_TOOLS_CONFIG",
        default_value = "epaper-tools.yaml"
    )]
    config: PathBuf,

    /// App name (overrides the APP_NAME build flag)
    #[arg(long, global = true)]
    app_name: Option<String>,

    /// Target board
    #[arg(long, global = true)]
    board: Option<String>,

    /// Compiler flags holding the -D defines
    #[arg(long, global = true, allow_hyphen_values = true)]
    build_flags: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rasterize an SVG file to PNG
    Png {
        /// Input SVG file
        svg: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Output height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Backends to try, in order (default: all)
        #[arg(long, value_delimiter = ',')]
        backend: Vec<String>,
    },
    /// Convert an SVG file into red and black BMP planes next to it
    Mono {
        /// Input SVG file
        svg: PathBuf,

        /// Accepted for compatibility; planes are always 200x200
        #[arg(long)]
        width: Option<u32>,

        /// Accepted for compatibility; planes are always 200x200
        #[arg(long)]
        height: Option<u32>,
    },
    /// Convert the configured images
    Images,
    /// Gzip the configured static assets
    Gzip,
    /// Customize and gzip the configured HTML pages
    Html,
    /// Copy the firmware image under its versioned name with MD5 files
    Firmware {
        /// Built firmware image
        #[arg(short, long)]
        input: PathBuf,

        /// Factory image (defaults to the firmware image)
        #[arg(long)]
        factory: Option<PathBuf>,

        /// CI ref name used as version branch
        #[arg(long, env = "REF_NAME")]
        ref_name: Option<String>,

        /// Repository the version is read from
        #[arg(long, default_value = ".")]
        git_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epaper_tools=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = load_config(&cli);

    match cli.command {
        Some(Commands::Png {
            svg,
            output,
            width,
            height,
            backend,
        }) => run_png_command(&config, &svg, &output, width, height, &backend),
        Some(Commands::Mono { svg, width, height }) => {
            run_mono_command(&config, &svg, width, height)
        }
        Some(Commands::Images) => run_images_command(&config),
        Some(Commands::Gzip) => run_gzip_command(&config),
        Some(Commands::Html) => run_html_command(&config),
        Some(Commands::Firmware {
            input,
            factory,
            ref_name,
            git_dir,
        }) => run_firmware_command(
            &config,
            &input,
            factory.as_deref(),
            ref_name.as_deref(),
            &git_dir,
        ),
        None => {
            run_status_command(&cli.config, &config);
            Ok(())
        }
    }
}

/// Config file values with command line overrides applied
fn load_config(cli: &Cli) -> ToolsConfig {
    let mut config = ToolsConfig::load(&cli.config);
    if let Some(app_name) = &cli.app_name {
        config.app_name = Some(app_name.clone());
    }
    if let Some(board) = &cli.board {
        config.board = board.clone();
    }
    if let Some(flags) = &cli.build_flags {
        config.build_flags = flags.clone();
    }
    config
}

fn rasterizer(config: &ToolsConfig) -> Rasterizer {
    Rasterizer::system().only(&config.rasterizer.backends)
}

fn run_png_command(
    config: &ToolsConfig,
    svg: &Path,
    output: &Path,
    width: Option<u32>,
    height: Option<u32>,
    backends: &[String],
) -> anyhow::Result<()> {
    let rasterizer = if backends.is_empty() {
        rasterizer(config)
    } else {
        Rasterizer::system().only(backends)
    };
    let job = RasterJob::new(svg, output).width(width).height(height);
    let backend = rasterizer.rasterize(&job)?;
    println!("Rendered {} with {backend}", output.display());
    Ok(())
}

fn run_mono_command(
    config: &ToolsConfig,
    svg: &Path,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<()> {
    let ditherer = Ditherer::new(rasterizer(config));
    let planes = ditherer.svg_to_mono(svg, width, height)?;
    println!("{}", planes.red.display());
    println!("{}", planes.black.display());
    Ok(())
}

fn run_images_command(config: &ToolsConfig) -> anyhow::Result<()> {
    let images = &config.images;
    let ditherer = Ditherer::new(rasterizer(config));
    let report = services::convert_images(
        &images.source_dir,
        &images.work_dir,
        &images.cache_dir,
        &images.files,
        &ditherer,
    )?;
    println!(
        "Images: {} converted, {} up to date",
        report.written.len(),
        report.skipped.len()
    );
    Ok(())
}

fn run_gzip_command(config: &ToolsConfig) -> anyhow::Result<()> {
    let gzip = &config.gzip;
    let report = services::gzip_assets(&gzip.source_dir, &gzip.cache_dir, &gzip.files)?;
    println!(
        "Assets: {} compressed, {} up to date",
        report.written.len(),
        report.skipped.len()
    );
    Ok(())
}

fn run_html_command(config: &ToolsConfig) -> anyhow::Result<()> {
    let ctx = config.build_context();
    let now = chrono::Local::now().naive_local();
    for page in &config.html {
        let outcome = services::customize_html(page, &ctx, now)
            .with_context(|| format!("Failed to customize {}", page.source.display()))?;
        match outcome {
            HtmlOutcome::Written { gzipped, .. } => println!("Wrote {}", gzipped.display()),
            HtmlOutcome::UpToDate => println!("{} up to date", page.source.display()),
        }
    }
    Ok(())
}

fn run_firmware_command(
    config: &ToolsConfig,
    input: &Path,
    factory: Option<&Path>,
    ref_name: Option<&str>,
    git_dir: &Path,
) -> anyhow::Result<()> {
    let ctx: BuildContext = config.build_context();
    let app = ctx.app_name()?;
    let version = services::resolve_version(&SystemGit::new(git_dir), ref_name)?;
    let variant = services::firmware_variant(&app, &ctx.board, &version);

    println!("App Version: {version}");
    println!("App Name: {app}");
    println!("Build Target: {}", ctx.env_name);
    println!("Board: {}", ctx.board);

    let package =
        services::package_firmware(input, factory, &config.firmware.output_dir, &variant)?;
    println!("Firmware: {}", package.bin.display());
    println!("Factory:  {}", package.factory_bin.display());
    Ok(())
}

/// Show version, configuration and which rasterization backends work here
fn run_status_command(config_path: &Path, config: &ToolsConfig) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("epaper-tools v{VERSION}");
    println!("Build-time asset tooling for tri-color e-paper firmware\n");

    println!("Configuration:");
    let source = if config_path.is_file() {
        config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_path.display())
    };
    println!("  File:   {source}");
    println!("  Images: {}", config.images.files.len());
    println!("  Assets: {}", config.gzip.files.len());
    println!("  Pages:  {}", config.html.len());

    println!("\nRasterization Backends:");
    let probes = rasterizer(config).probe_all();
    let width = probes.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, probe) in probes {
        match probe {
            Probe::Available => println!("  {name:<width$}  available"),
            Probe::Missing(reason) => println!("  {name:<width$}  missing ({reason})"),
        }
    }
}
