//! lightctl - Kuando Busylight control CLI
//!
//! Drives a Busylight directly over USB HID: solid colors, triangle-wave
//! pulses, device info, and a live view of connection events.

mod color_arg;

use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use busylight_driver::{Busylight, ConnectionEvent, ConnectionState, DriverConfig};
use busylight_hid_common::HidapiPort;
use clap::{Parser, Subcommand};
use crossbeam::channel::{Receiver, RecvTimeoutError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::color_arg::parse_color;

#[derive(Parser)]
#[command(name = "lightctl")]
#[command(about = "Kuando Busylight control - set colors, pulse, and watch connection state")]
#[command(version)]
struct Cli {
    /// Output device info in JSON for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Animation tick in milliseconds
    #[arg(long, global = true, env = "LIGHTCTL_TICK_MS", hide = true)]
    tick_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the connected device, if any
    Info,

    /// Show a solid color for a while, then release the device
    Light {
        /// Color as 6-digit hex, e.g. ff8800 or "#00ff00"
        color: String,

        /// How long to hold the color before exiting
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },

    /// Pulse between a color and a low stop
    Pulse {
        /// High color as 6-digit hex
        color: String,

        /// Low color as 6-digit hex (default: off)
        #[arg(long, default_value = "000000")]
        low: String,

        /// Full cycle duration in milliseconds
        #[arg(long, default_value_t = 2000)]
        rate_ms: u64,

        /// How long to pulse before exiting
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },

    /// Turn the light off
    Off,

    /// Stream connection events until interrupted
    Watch {
        /// Stop after this many seconds (default: run until killed)
        #[arg(long)]
        seconds: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("lightctl={log_level},busylight_driver={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = DriverConfig::default();
    if let Some(tick_ms) = cli.tick_ms {
        config.tick = Duration::from_millis(tick_ms);
    }

    tracing::debug!(tick_ms = config.tick.as_millis() as u64, "driver config");

    let port = HidapiPort::new()?;
    let mut driver = Busylight::open(Box::new(port), config);
    let events = driver.events();

    // The worker connects asynchronously; wait for the first transition
    // so commands land on an attached device when one is present.
    let first = events.recv_timeout(Duration::from_secs(5)).ok();

    let result = run_command(cli, &driver, &events, first);
    driver.close();
    result
}

fn run_command(
    cli: Cli,
    driver: &Busylight,
    events: &Receiver<ConnectionEvent>,
    first: Option<ConnectionEvent>,
) -> Result<()> {
    match cli.command {
        Commands::Info => run_info(driver, cli.json),
        Commands::Light { color, seconds } => {
            driver.light(parse_color(&color)?);
            hold(seconds);
            Ok(())
        }
        Commands::Pulse {
            color,
            low,
            rate_ms,
            seconds,
        } => {
            let high = parse_color(&color)?;
            let low = parse_color(&low)?;
            driver.pulse(&[high, low], Duration::from_millis(rate_ms));
            hold(seconds);
            driver.off();
            Ok(())
        }
        Commands::Off => {
            driver.off();
            // Give the worker a beat to flush the write.
            hold(1);
            Ok(())
        }
        Commands::Watch { seconds } => run_watch(events, first, seconds),
    }
}

fn run_info(driver: &Busylight, json: bool) -> Result<()> {
    match driver.device_info() {
        Some(info) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{} ({:04x}:{:04x}) at {}",
                    info.display_name(),
                    info.vendor_id,
                    info.product_id,
                    info.path
                );
            }
            Ok(())
        }
        None if driver.state() == ConnectionState::Connecting => {
            bail!("no supported Busylight attached (still scanning)")
        }
        None => bail!("no supported Busylight attached"),
    }
}

fn run_watch(
    events: &Receiver<ConnectionEvent>,
    first: Option<ConnectionEvent>,
    seconds: Option<u64>,
) -> Result<()> {
    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));

    if let Some(event) = first {
        print_event(&event);
    }
    loop {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Ok(());
            }
        }
        match events.recv_timeout(Duration::from_millis(250)) {
            Ok(event) => print_event(&event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

fn print_event(event: &ConnectionEvent) {
    match event {
        ConnectionEvent::Connected(info) => println!("connected: {}", info.display_name()),
        ConnectionEvent::Disconnected => println!("disconnected"),
        ConnectionEvent::Error(fault) => println!("error: {fault}"),
    }
}

fn hold(seconds: u64) {
    std::thread::sleep(Duration::from_secs(seconds));
}
