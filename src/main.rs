//! packet_capture - log every frame on an interface for a fixed duration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use packet_capture::config::{
    resolve_timeout_from_millis, DEFAULT_OUTPUT_PATH, DEFAULT_RESOLVE_TIMEOUT_MS,
};
use packet_capture::{
    CaptureConfig, CaptureSession, EndpointResolver, PnetCapture, RecordEmitter, ResolverConfig,
    SystemResolver,
};

#[derive(Parser)]
#[command(name = "packet_capture")]
#[command(about = "Capture raw frames for a fixed duration and log one line per frame")]
struct Args {
    /// Duration to capture packets, in seconds
    #[arg(
        short = 't',
        long = "duration",
        allow_negative_numbers = true,
        required_unless_present = "list_interfaces"
    )]
    duration: Option<i64>,

    /// File to save captured packets to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Network interface to capture on (e.g., eth0)
    #[arg(short, long)]
    interface: Option<String>,

    /// List available interfaces and exit
    #[arg(long)]
    list_interfaces: bool,

    /// Record addresses only, skip reverse name lookups
    #[arg(long)]
    no_resolve: bool,

    /// Maximum wait per reverse lookup in milliseconds (0 waits indefinitely)
    #[arg(long, default_value_t = DEFAULT_RESOLVE_TIMEOUT_MS)]
    resolve_timeout_ms: u64,

    /// Cache lookup results for this many seconds
    #[arg(long)]
    cache_ttl_secs: Option<u64>,

    /// Append to the output file instead of truncating it
    #[arg(long)]
    append: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args, duration: i64) -> Result<CaptureConfig> {
    let resolver = if args.no_resolve {
        ResolverConfig::disabled()
    } else {
        ResolverConfig::default()
    }
    .with_timeout(resolve_timeout_from_millis(args.resolve_timeout_ms))
    .with_cache_ttl(args.cache_ttl_secs.map(Duration::from_secs));

    let config = CaptureConfig::new(duration, args.output.clone())?
        .with_interface(args.interface.clone())
        .with_append(args.append)
        .with_resolver(resolver)
        .apply_env_overrides()?;

    Ok(config)
}

fn run(args: Args) -> Result<()> {
    if args.list_interfaces {
        for iface in PnetCapture::list_interfaces() {
            println!("{}", iface);
        }
        return Ok(());
    }

    let duration = args.duration.context("capture duration must be specified with -t")?;
    let config = build_config(&args, duration).context("Invalid configuration")?;

    let source = PnetCapture::open(config.interface.as_deref())
        .context("Failed to open capture channel")?;
    let sink = config.open_sink()?;

    let resolver = EndpointResolver::new(Arc::new(SystemResolver::new()), &config.resolver);
    let mut session =
        CaptureSession::new(source, resolver, RecordEmitter::new(sink), config.duration);

    let token = session.cancellation_token();
    ctrlc::set_handler(move || {
        tracing::info!("Interrupted, stopping capture");
        token.cancel();
    })
    .context("Failed to install Ctrl+C handler")?;

    tracing::info!(
        "Starting packet capture for {} seconds, writing to {}",
        config.duration.as_secs(),
        config.output.display()
    );

    session.run().context("Capture failed")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    run(args)
}
