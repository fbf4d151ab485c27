use clap::Parser;
use lidar_bridge::{run_bridge, BridgeConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Reads packets from a lidar attached over UART and serves them to a
/// downstream client over TCP, one frame per connection.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "localhost")]
    address: String,
    /// Port to listen on
    #[arg(short, long, default_value_t = 5005)]
    port: u16,
    /// The device path to the sensor's serial port
    #[arg(short = 's', long, default_value = "/dev/ttyUSB0")]
    device: String,
    /// Serial baud rate
    #[arg(short = 'u', long, default_value_t = 115200)]
    baud: u32,
    /// Serial read timeout in milliseconds
    #[arg(short = 'r', long, default_value_t = 1000)]
    serial_timeout_ms: u64,
    /// Socket accept timeout in milliseconds
    #[arg(short = 't', long, default_value_t = 1000)]
    socket_timeout_ms: u64,
    /// Generate synthetic sensor data instead of opening a serial device
    #[arg(short, long)]
    mock: bool,
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = BridgeConfig {
        address: args.address,
        port: args.port,
        device: args.device,
        baud_rate: args.baud,
        serial_timeout_ms: args.serial_timeout_ms,
        accept_timeout_ms: args.socket_timeout_ms,
        mock: args.mock,
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        error!("Failed to install Ctrl-C handler: {e}");
        std::process::exit(1);
    }

    let (bridge_threads, addr) = match run_bridge(&config) {
        Ok(started) => started,
        Err(e) => {
            error!("Failed to start bridge: {e}");
            std::process::exit(1);
        }
    };
    info!("Serving lidar frames at {addr}");

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    info!("Stopping bridge");
    drop(bridge_threads);
}
