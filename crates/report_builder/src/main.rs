//! Report Builder CLI
//!
//! Trial CSV → 9-page mocap PDF report
//! C3D capture → skeleton flipbook / snapshot sheet

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use mocap_core::skeleton::{DEFAULT_FRAME_STEP, DEFAULT_SNAPSHOT_FRAMES, DEFAULT_TRAIL_MARKER};
#[cfg(feature = "cli")]
use mocap_core::{C3dFile, ReportConfig};
#[cfg(feature = "cli")]
use report_builder::{PdfMetadata, ReportGenerator};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "report_builder")]
#[command(about = "Build pitching mocap reports and skeleton renderings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build the 9-page PDF report
    Report {
        /// YAML report configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// POI metrics CSV (built-in sample session when absent)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Use every CSV row instead of the cohort filter
        #[arg(long, default_value = "false")]
        no_filter: bool,

        /// Output PDF path (overrides the configured output)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Player name shown in the header
        #[arg(long)]
        player: Option<String>,

        /// Date text shown in the footer
        #[arg(long)]
        date: Option<String>,

        /// Velocity range shown in the header (e.g., "90mph - 92mph")
        #[arg(long)]
        velocity: Option<String>,

        /// Verify the PDF checksum after writing
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Mean and std dev of every numeric CSV column (JSON)
    Stats {
        /// YAML report configuration (cohort filter and CSV path)
        #[arg(long)]
        config: Option<PathBuf>,

        /// POI metrics CSV (overrides the configured CSV)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Summarize every row instead of the cohort
        #[arg(long, default_value = "false")]
        no_filter: bool,

        /// Write the JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Render one skeleton page per sampled C3D frame
    Skeleton {
        /// Input C3D file
        #[arg(long)]
        c3d: PathBuf,

        /// Output PDF path
        #[arg(long)]
        out: PathBuf,

        /// Draw every n-th frame
        #[arg(long, default_value_t = DEFAULT_FRAME_STEP)]
        frame_step: usize,
    },

    /// Render a snapshot sheet with a marker trail
    Snapshots {
        /// Input C3D file
        #[arg(long)]
        c3d: PathBuf,

        /// Output PDF path
        #[arg(long)]
        out: PathBuf,

        /// 0-based frames, one panel each
        #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SNAPSHOT_FRAMES)]
        frames: Vec<usize>,

        /// Marker whose path is traced
        #[arg(long, default_value = DEFAULT_TRAIL_MARKER)]
        trail_marker: String,
    },

    /// Print a C3D file summary (JSON)
    C3dInfo {
        /// Input C3D file
        #[arg(long)]
        c3d: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            config,
            csv,
            no_filter,
            out,
            player,
            date,
            velocity,
            verify,
            metadata,
        } => {
            let mut report_config = load_config(config.as_deref())?;
            if csv.is_some() {
                report_config.csv = csv;
            }
            if no_filter {
                report_config.apply_filter = false;
            }
            if let Some(out) = out {
                report_config.output = out;
            }
            if let Some(player) = player {
                report_config.player_name = player;
            }
            if date.is_some() {
                report_config.date = date;
            }
            if let Some(velocity) = velocity {
                report_config.velocity_range = velocity;
            }
            let output = report_config.output.clone();

            println!("🔨 Building mocap report...");
            match &report_config.csv {
                Some(csv) => println!("   CSV Input: {}", csv.display()),
                None => println!("   CSV Input: (sample session)"),
            }
            println!("   Output:    {}", output.display());
            println!("   Player:    {}", report_config.player_name);

            let generator = ReportGenerator::from_config(report_config)?;
            let (path, meta) = generator.generate(&output)?;

            println!("\n⚾ {}", generator.context().timing.describe());
            println!("   Trials:    {}", meta.trials);
            print_metadata(&meta.pdf);

            if verify {
                verify_integrity(&path, &meta.pdf.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Stats {
            config,
            csv,
            no_filter,
            out,
        } => {
            let mut stats_config = load_config(config.as_deref())?;
            if no_filter {
                stats_config.apply_filter = false;
            }
            let Some(csv) = csv.or_else(|| stats_config.csv.clone()) else {
                anyhow::bail!("No CSV given: pass --csv or set `csv` in the config");
            };
            let stats = report_builder::column_stats(
                &csv,
                report_builder::cohort_filter(&stats_config),
            )?;
            match out {
                Some(path) => save_metadata(&path, &stats)?,
                None => println!("{}", serde_json::to_string_pretty(&stats)?),
            }
        }

        Commands::Skeleton {
            c3d,
            out,
            frame_step,
        } => {
            println!("🔨 Rendering skeleton flipbook...");
            println!("   C3D Input:  {}", c3d.display());
            println!("   Output:     {}", out.display());
            println!("   Frame step: {}", frame_step);

            let file = open_c3d(&c3d)?;
            let meta = report_builder::render_flipbook(&file, &out, frame_step)?;
            print_metadata(&meta.pdf);
        }

        Commands::Snapshots {
            c3d,
            out,
            frames,
            trail_marker,
        } => {
            println!("🔨 Rendering snapshot sheet...");
            println!("   C3D Input: {}", c3d.display());
            println!("   Output:    {}", out.display());
            println!("   Frames:    {:?}", frames);

            let file = open_c3d(&c3d)?;
            let meta = report_builder::render_snapshots(&file, &out, &frames, &trail_marker)?;
            print_metadata(&meta.pdf);
        }

        Commands::C3dInfo { c3d } => {
            let file = open_c3d(&c3d)?;
            println!("{}", serde_json::to_string_pretty(&file.summary())?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(ReportConfig::default()),
    }
}

#[cfg(feature = "cli")]
fn open_c3d(path: &Path) -> Result<C3dFile> {
    C3dFile::open(path).with_context(|| format!("Failed to read C3D file: {}", path.display()))
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &PdfMetadata) {
    println!("\n✅ PDF written successfully!");
    println!("   Pages:    {}", meta.page_count);
    println!(
        "   Size:     {} bytes ({:.2} KB)",
        meta.size_bytes,
        meta.size_bytes as f64 / 1024.0
    );
    println!("   Checksum: {}", meta.checksum);
    println!("   Created:  {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_integrity(path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying PDF integrity...");
    if report_builder::verify_pdf(path, checksum)? {
        println!("✅ PDF verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ PDF verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata<T: serde::Serialize>(path: &Path, meta: &T) -> Result<()> {
    report_builder::save_metadata(path, meta)?;
    println!("\n📄 Metadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("report_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
