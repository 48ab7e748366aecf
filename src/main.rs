// src/main.rs

use anyhow::{bail, Context};
use chrono::NaiveTime;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use hivetemp_viz::animation::driver::FrameDriver;
use hivetemp_viz::config::{ColormapChoice, PipelineConfig};
use hivetemp_viz::constants::{
    DEFAULT_PREVIEW_FILE, DEFAULT_ROTATE_EVERY_NTH_FRAME, SENTINEL_CODES,
};
use hivetemp_viz::data_analysis::extents::{resolve_extent, Extent, ExtentMode};
use hivetemp_viz::data_analysis::lattice::LatticeSampler;
use hivetemp_viz::data_input::log_parser::parse_log_file;
use hivetemp_viz::data_input::relabel::ProbeRelabel;
use hivetemp_viz::data_input::selection::{select, Selection};
use hivetemp_viz::data_input::timestamping::{log_files_in, timestamp_log_file};
use hivetemp_viz::link::history::pull_new_records;
use hivetemp_viz::link::session::TelemetryLink;
use hivetemp_viz::render::preview::{stdin_events, PreviewRenderer};
use hivetemp_viz::render::raycast::SoftwareRenderer;

#[derive(Parser, Debug)]
#[command(name = "hivetemp-viz", version, about = "Volumetric rendering of beehive temperature telemetry")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a telemetry log as an animated volume
    Render(RenderArgs),
    /// Prefix every line of the given log files with its epoch seconds (writes c_<name>)
    Timestamp {
        /// Log files, or directories whose *.log files are processed
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Pull new records from the logger into the local telemetry log
    Pull {
        /// Serial device of the logger, already configured for the link speed
        #[arg(long)]
        device: PathBuf,
        /// Directory holding the local *.log history
        #[arg(long, default_value = ".")]
        log_dir: PathBuf,
    },
    /// Run one file browser command on the logger's SD card
    Browse {
        #[arg(long)]
        device: PathBuf,
        #[command(subcommand)]
        action: BrowseAction,
    },
}

#[derive(Subcommand, Debug)]
enum BrowseAction {
    /// List files
    Ls,
    /// Download a file into the current directory
    Cat { name: String },
    /// Delete a file
    Rm { name: String },
    /// Run the logger's file test
    Test { name: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ExtentSource {
    /// Min/max of the raw probe values
    Raw,
    /// Min/max after interpolating every row (slow)
    True,
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Input log file
    input: PathBuf,

    /// Render frames offscreen into this directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// First row to render
    #[arg(short, long)]
    start: Option<usize>,

    /// Last row to render (inclusive)
    #[arg(short, long)]
    end: Option<usize>,

    /// Lower temperature bound; skips the extent scan together with --max
    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,

    /// Upper temperature bound; skips the extent scan together with --min
    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,

    /// Extent scan used when --min/--max are not both given
    #[arg(long, value_enum, default_value_t = ExtentSource::True)]
    extents: ExtentSource,

    /// Pipeline configuration file (TOML, YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Selection::All)]
    select: Selection,

    /// Start of the daily window (HH:MM)
    #[arg(long, value_parser = parse_clock, default_value = "04:00")]
    window_start: NaiveTime,

    /// End of the daily window (HH:MM)
    #[arg(long, value_parser = parse_clock, default_value = "05:00")]
    window_end: NaiveTime,

    /// Overrides the configured colormap
    #[arg(long, value_enum)]
    colormap: Option<ColormapChoice>,

    /// Overrides the configured spline order (0-3)
    #[arg(long)]
    zoom_order: Option<u8>,

    /// Rotate the volume in interactive mode too
    #[arg(long)]
    rotate: bool,

    /// Preview image rewritten on every interactive frame
    #[arg(long)]
    preview: Option<PathBuf>,
}

fn parse_clock(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| format!("expected HH:MM: {}", e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("hivetemp-viz {}", hivetemp_viz::crate_version());
    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Timestamp { paths } => run_timestamp(&paths),
        Command::Pull { device, log_dir } => run_pull(&device, &log_dir),
        Command::Browse { device, action } => run_browse(&device, action),
    }
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = PipelineConfig::load(args.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", args.config))?;
    if let Some(colormap) = args.colormap {
        config.colormap = colormap;
    }
    if let Some(order) = args.zoom_order {
        config.zoom_order = order;
    }
    if args.rotate {
        config.rotate_interactive = true;
    }

    let mut table = parse_log_file(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!("Transforming data");
    let replaced = table.substitute_bad_values(&SENTINEL_CODES);
    if replaced > 0 {
        info!("Replaced {} fault readings with 0", replaced);
    }
    table.relabel(&ProbeRelabel::hive_wiring_correction());

    let selected = select(table, args.select, (args.window_start, args.window_end));
    if selected.static_time.is_some() {
        config.overlay.static_time = selected.static_time.clone();
    }
    if let Some(every_nth) = selected.rotate_every_nth_frame {
        if config.rotate_every_nth_frame == DEFAULT_ROTATE_EVERY_NTH_FRAME {
            config.rotate_every_nth_frame = every_nth;
        }
    }
    config.validate()?;
    let table = selected.table;
    if table.is_empty() {
        bail!("no rows left to render in {}", args.input.display());
    }

    let sampler = LatticeSampler::new(config.vertical_flip);
    let mode = match (args.min, args.max) {
        (Some(min), Some(max)) => ExtentMode::Override(Extent::new(min, max)?),
        (min, max) => {
            if min.is_some() || max.is_some() {
                warn!("Both --min and --max are needed to skip the extent scan");
            }
            match args.extents {
                ExtentSource::Raw => ExtentMode::Raw,
                ExtentSource::True => ExtentMode::True,
            }
        }
    };
    let extent = resolve_extent(
        mode,
        &table,
        &sampler,
        config.zoom_factor,
        config.spline_order()?,
    )?;

    let mut driver = FrameDriver::new(&table, &config, extent, args.start.unwrap_or(0), args.end)?;
    let renderer = SoftwareRenderer::new(config.render.clone());

    match args.out_dir {
        Some(out_dir) => {
            info!("Will render frames to {}", out_dir.display());
            let mut renderer = renderer;
            let report = driver.run_offscreen(&mut renderer, &out_dir)?;
            info!("Done: {} frames", report.frames);
        }
        None => {
            let preview = args
                .preview
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREVIEW_FILE));
            info!(
                "Rendering preview to {}. Press Enter to stop.",
                preview.display()
            );
            let mut renderer = PreviewRenderer::new(renderer, preview).with_events(stdin_events());
            let state = driver.run_interactive(
                &mut renderer,
                Duration::from_millis(config.tick_interval_ms),
            )?;
            info!("Stopped at frame {}", state.frame);
        }
    }
    Ok(())
}

fn run_timestamp(paths: &[PathBuf]) -> anyhow::Result<()> {
    for path in paths {
        let files = if path.is_dir() {
            log_files_in(path)?
        } else {
            vec![path.clone()]
        };
        for file in files {
            timestamp_log_file(&file).with_context(|| format!("timestamping {}", file.display()))?;
        }
    }
    Ok(())
}

fn open_link(device: &Path) -> anyhow::Result<TelemetryLink<std::fs::File>> {
    let stream = OpenOptions::new()
        .read(true)
        .write(true)
        .open(device)
        .with_context(|| format!("could not connect to {}", device.display()))?;
    info!("Connected to {}", device.display());
    Ok(TelemetryLink::new(stream))
}

fn run_pull(device: &Path, log_dir: &Path) -> anyhow::Result<()> {
    let mut link = open_link(device)?;
    let (log_path, lines) = pull_new_records(&mut link, log_dir)?;
    info!("{} new lines in {}", lines, log_path.display());
    Ok(())
}

fn run_browse(device: &Path, action: BrowseAction) -> anyhow::Result<()> {
    let mut link = open_link(device)?;
    link.wait_for_prompt()?;
    match action {
        BrowseAction::Ls => println!("{}", link.ls()?),
        BrowseAction::Cat { name } => {
            let contents = link.cat(&name)?;
            std::fs::write(&name, contents)?;
            info!("Saved to {}", name);
        }
        BrowseAction::Rm { name } => println!("{}", link.rm(&name)?),
        BrowseAction::Test { name } => println!("{}", link.test(&name)?),
    }
    Ok(())
}

// src/main.rs
