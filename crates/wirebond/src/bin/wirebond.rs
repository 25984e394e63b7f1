//! `wirebond` command-line interface.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use wirebond::annotate::{annotate_registration, annotate_wiring};
use wirebond::inspect::{image_file_name, inspect_wiring, load_rgb, register_images};
use wirebond::io::{find_pair_near, reference_for, write_json};
use wirebond::register::PadLayout;
use wirebond::wires::ModuleTable;
use wirebond::InspectConfig;

#[cfg(not(feature = "tracing"))]
use log::info;
#[cfg(feature = "tracing")]
use tracing::info;

use wirebond::core::level_for_verbosity;
#[cfg(feature = "tracing")]
use wirebond::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use wirebond::core::init_with_level;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "wirebond")]
#[command(about = "Inspect wire-bonded module photographs: wire count, touching wires, registration")]
#[command(version)]
struct Cli {
    /// Raise the log level (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the wires of a bonded module and look for touching wires.
    Check(CheckArgs),

    /// Carry the reference fiducials onto a photographed board.
    Register(RegisterArgs),

    /// Print the reference/bonded counterpart of a photograph.
    Pair(PairArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Photograph of the bonded module; its name carries the serial number.
    image: PathBuf,

    /// Module table (JSON). Defaults to `module_table` from the config.
    #[arg(long)]
    modules: Option<PathBuf>,

    /// Inspection config (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a copy with touching wires painted red and wire ends marked.
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Write the full wiring report (JSON).
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// Photograph of the board to register.
    photo: PathBuf,

    /// Unwired reference image of the same board.
    #[arg(long, conflicts_with = "dir")]
    reference: Option<PathBuf>,

    /// Directory searched for the reference when `--reference` is absent.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Reference pad layout (JSON). Defaults to `pad_layout` from the config.
    #[arg(long)]
    pads: Option<PathBuf>,

    /// Inspection config (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a copy with predicted fiducials and pads drawn.
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Write the registration report (JSON).
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PairArgs {
    /// Photograph whose counterpart is wanted.
    file: PathBuf,

    /// Directory to search. Defaults to the directory of `file`.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Inspection config (JSON), for custom pairing markers.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match &cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Register(args) => run_register(args),
        Commands::Pair(args) => run_pair(args),
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8) -> CliResult<()> {
    init_with_level(level_for_verbosity(verbose))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8) -> CliResult<()> {
    init_tracing(false, level_for_verbosity(verbose));
    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<InspectConfig> {
    Ok(match path {
        Some(path) => InspectConfig::load_json(path)?,
        None => InspectConfig::default(),
    })
}

fn run_check(args: &CheckArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let table_path = args
        .modules
        .as_ref()
        .or(config.module_table.as_ref())
        .ok_or("no module table: pass --modules or set `module_table` in the config")?;
    let table = ModuleTable::load_json(table_path)?;

    info!("loading {}", args.image.display());
    let img = load_rgb(&args.image)?;
    let report = inspect_wiring(&img, image_file_name(&args.image)?, &table, &config.wiring)?;

    println!("serial: {}", report.serial);
    println!("expected wires: {}", report.check.expected);
    println!("detected wires: {}", report.check.detected);
    println!("touching wires: {}", report.touching);
    println!("result: {}", if report.check.passed { "PASS" } else { "FAIL" });

    if let Some(path) = &args.annotate {
        annotate_wiring(&img, &report.analysis).save(path)?;
        info!("annotated image written to {}", path.display());
    }
    if let Some(path) = &args.report {
        write_json(&report, path)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn run_register(args: &RegisterArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let reference_path = match &args.reference {
        Some(path) => path.clone(),
        None => reference_for(&args.photo, args.dir.as_deref(), &config.pairing)?,
    };
    let layout = args
        .pads
        .as_ref()
        .or(config.pad_layout.as_ref())
        .map(PadLayout::load_json)
        .transpose()?;

    info!("reference {}", reference_path.display());
    let reference = load_rgb(&reference_path)?;
    let photo = load_rgb(&args.photo)?;
    let report = register_images(&reference, &photo, &config.registration, layout.as_ref())?;

    let frame = &report.registration.photo_frame;
    println!("reference: {}", reference_path.display());
    println!(
        "frame origin: ({:.2}, {:.2}) dilation: {:.2}",
        frame.origin.x, frame.origin.y, frame.dilation
    );
    println!(
        "relative dilation: {:.4}",
        report.registration.relative_dilation
    );
    for (i, p) in report.registration.mapped_targets.iter().enumerate() {
        println!("target {i}: ({:.2}, {:.2})", p.x, p.y);
    }
    for (i, pad) in report.pads.iter().enumerate() {
        let (lo, hi) = pad.bounds();
        println!(
            "pad {i}: ({:.1}, {:.1}) - ({:.1}, {:.1})",
            lo.x, lo.y, hi.x, hi.y
        );
    }

    if let Some(path) = &args.annotate {
        annotate_registration(&photo, &report).save(path)?;
        info!("annotated image written to {}", path.display());
    }
    if let Some(path) = &args.report {
        write_json(&report, path)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn run_pair(args: &PairArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    match find_pair_near(&args.file, args.dir.as_deref(), &config.pairing)? {
        Some(path) => println!("{}", path.display()),
        None => println!("no pair"),
    }
    Ok(())
}
