//! graybmp - command-line front end for graybmp-core.
//!
//! ```text
//! graybmp process [Picture.bmp] --out-dir out/
//! graybmp rotate in.bmp out.bmp --direction ccw
//! graybmp smooth in.bmp out.bmp
//! graybmp info in.bmp
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use graybmp_core::pipeline::{self, PipelineConfig};
use graybmp_core::{BmpImage, RotationDirection};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "graybmp", version, about = "Rotate and smooth 8-bit grayscale BMP images")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write clockwise, counter-clockwise and smoothed versions of one image
    Process(ProcessArgs),
    /// Rotate one image by 90 degrees
    Rotate {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Direction::Cw)]
        direction: Direction,
    },
    /// Apply the 3x3 Gaussian filter to one image
    Smooth { input: PathBuf, output: PathBuf },
    /// Print the header of an image as JSON
    Info { input: PathBuf },
}

#[derive(Debug, Args)]
struct ProcessArgs {
    /// Source image
    #[arg(default_value = "Picture.bmp")]
    input: PathBuf,

    /// Directory to write the outputs to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Which rotation the filtered output is made from
    #[arg(long, value_enum, default_value_t = Direction::Cw)]
    filter_source: Direction,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Direction {
    /// Clockwise
    Cw,
    /// Counter-clockwise
    Ccw,
}

impl From<Direction> for RotationDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Cw => RotationDirection::Clockwise,
            Direction::Ccw => RotationDirection::CounterClockwise,
        }
    }
}

impl ProcessArgs {
    fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            output_dir: self.out_dir.clone(),
            filter_source: self.filter_source.into(),
            ..PipelineConfig::new(&self.input)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn process(args: &ProcessArgs) -> Result<()> {
    let config = args.to_config();
    let report = pipeline::run(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Loaded {} ({}x{}, {} bytes).",
            report.input.display(),
            report.source_width,
            report.source_height,
            report.source_file_size
        );
        for output in &report.outputs {
            println!(
                "{}: wrote {} ({}x{}, {} bytes).",
                output.stage,
                output.path.display(),
                output.width,
                output.height,
                output.bytes
            );
        }
    }
    Ok(())
}

fn rotate(input: &Path, output: &Path, direction: Direction) -> Result<()> {
    let image = BmpImage::load(input)
        .with_context(|| format!("decode failed for {}", input.display()))?;
    let rotated = image.rotated(direction.into());
    rotated
        .save(output)
        .with_context(|| format!("encode failed writing {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), ?direction, "rotated");
    Ok(())
}

fn smooth(input: &Path, output: &Path) -> Result<()> {
    let image = BmpImage::load(input)
        .with_context(|| format!("decode failed for {}", input.display()))?;
    image
        .smoothed()
        .save(output)
        .with_context(|| format!("encode failed writing {}", output.display()))?;
    info!(input = %input.display(), output = %output.display(), "smoothed");
    Ok(())
}

fn print_info(input: &Path) -> Result<()> {
    let image = BmpImage::load(input)
        .with_context(|| format!("decode failed for {}", input.display()))?;
    let summary = serde_json::json!({
        "path": input,
        "header": image.header,
        "gap_len": image.gap.len(),
        "width": image.width(),
        "height": image.height(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Process(args) => process(args),
        Command::Rotate {
            input,
            output,
            direction,
        } => rotate(input, output, *direction),
        Command::Smooth { input, output } => smooth(input, output),
        Command::Info { input } => print_info(input),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
