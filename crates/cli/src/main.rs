//! E-paper controller loader CLI.
//!
//! This binary exposes the two loaders as subcommands. It performs:
//! 1. **Image upload:** Decode a hex-literal image source and write it into a flash sector.
//! 2. **Sequence commands:** Write the event-driven image transition table (demo or from JSON).
//!
//! Both subcommands open the device, run one exchange, and release the device before exiting.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use epdload_core::Result;
use epdload_core::config::{Config, LinkKind};
use epdload_core::image::{Panel, Sector};
use epdload_core::link;
use epdload_core::protocol::sequence::DEMO_IMAGES;
use epdload_core::protocol::{self, AckPolicy, CommandTable};

#[derive(Parser, Debug)]
#[command(
    name = "epdload",
    author,
    version,
    about = "Load images and sequence commands into an e-paper display controller",
    long_about = "Load images and sequence commands into an e-paper display controller.\n\nThe device is opened as a raw character device unless --serial is given.\n\nExamples:\n  epdload load-image /dev/ttyACM0 images/cat.h 3\n  epdload --serial --baud 9600 load-image /dev/ttyUSB0 images/cat.h 3 --panel 2.7\n  epdload seq-commands /dev/ttyACM0\n  epdload --strict seq-commands /dev/ttyACM0 --table slideshow.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file; flags below override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Open the device as a serial port (stale input is flushed on open).
    #[arg(long, global = true)]
    serial: bool,

    /// Serial line speed.
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Serial read timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Acknowledgment checking: ignore, warn, or strict.
    #[arg(long, global = true, conflicts_with = "strict")]
    ack_policy: Option<AckPolicy>,

    /// Abort on the first unexpected acknowledgment (same as --ack-policy strict).
    #[arg(long, global = true)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a hex-literal image source into a flash sector.
    LoadImage {
        /// Device path or serial port.
        device: String,

        /// Text file containing `0x..` byte literals (e.g. a C array).
        image: PathBuf,

        /// Destination sector, decimal 0-255.
        sector: Sector,

        /// Panel the image is drawn for (1.44, 2.0, 2.7); warns on a size mismatch.
        #[arg(long)]
        panel: Option<Panel>,
    },

    /// Write the sequence-command table.
    SeqCommands {
        /// Device path or serial port.
        device: String,

        /// JSON table to send instead of the built-in five-image timer slideshow.
        #[arg(long)]
        table: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `-v` level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Merges the optional configuration file with command-line overrides.
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if cli.serial {
        config.link.kind = LinkKind::Serial;
    }
    if let Some(baud) = cli.baud {
        config.link.baud_rate = baud;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.link.timeout_ms = timeout_ms;
    }
    if cli.strict {
        config.ack_policy = AckPolicy::Strict;
    } else if let Some(policy) = cli.ack_policy {
        config.ack_policy = policy;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = build_config(&cli)?;
    info!(link = ?config.link, ack_policy = ?config.ack_policy, "configuration");

    match cli.command {
        Commands::LoadImage {
            device,
            image,
            sector,
            panel,
        } => {
            config.panel = panel.or(config.panel);
            let blob = protocol::read_image(&image, &config)?;
            let stats = link::with_channel(&config.link, &device, |channel| {
                protocol::upload_image(channel, &blob, sector, config.ack_policy)
            })?;
            println!(
                "[*] Image {} -> {device} sector {sector}: {stats}",
                image.display()
            );
        }
        Commands::SeqCommands { device, table } => {
            let table = match table {
                Some(path) => CommandTable::from_json_file(path)?,
                None => CommandTable::demo(DEMO_IMAGES),
            };
            let stats = link::with_channel(&config.link, &device, |channel| {
                protocol::put_seq_commands(channel, &table, config.ack_policy)
            })?;
            println!(
                "[*] {} sequence command(s) -> {device}: {stats}",
                table.len()
            );
        }
    }
    Ok(())
}
