//! QR Authentication Card CLI
//!
//! Headless terminal shell around the card controller. Reads commands
//! from stdin (`scan`, `back`, `submit <password>`, `close`) and prints
//! the card state after each one. Ctrl-C closes the card.

use clap::{Parser, ValueEnum};
use qr_auth_card::{
    capture::{CameraBackend, MockBackend},
    card::{AuthCard, Event, SessionState, StubVerifier},
    config::CardConfig,
    decode::QrDecoder,
    metrics::{MetricsRegistry, MetricsSnapshot},
    runtime::EventLoop,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "qr-auth-card", version, about = "Password or QR-code authentication card")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera backend to use.
    #[arg(long, value_enum, default_value_t = BackendKind::Mock)]
    backend: BackendKind,

    /// Serve Prometheus metrics on this port (overrides the config file).
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Print the final metrics to stdout on exit.
    #[arg(long)]
    print_metrics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Synthetic frames, no hardware needed.
    Mock,
    /// Platform camera through nokhwa.
    #[cfg(feature = "camera")]
    Native,
}

/// Where snapshots go after each event.
enum MetricsSink {
    Local(MetricsRegistry),
    #[cfg(feature = "metrics")]
    Served(std::sync::Arc<tokio::sync::RwLock<qr_auth_card::metrics::MetricsState>>),
}

impl MetricsSink {
    fn update(&mut self, snapshot: &MetricsSnapshot) {
        match self {
            MetricsSink::Local(registry) => registry.update(snapshot),
            #[cfg(feature = "metrics")]
            MetricsSink::Served(state) => state.blocking_write().update(snapshot),
        }
    }

    fn encode(&self) -> Option<String> {
        let encoded = match self {
            MetricsSink::Local(registry) => registry.encode(),
            #[cfg(feature = "metrics")]
            MetricsSink::Served(state) => state.blocking_read().encode(),
        };
        match encoded {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to encode metrics: {}", e);
                None
            }
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match CardConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => CardConfig::default(),
    };
    if let Some(port) = cli.metrics_port {
        config.output.metrics_port = port;
    }

    info!("QR Auth Card v{}", qr_auth_card::VERSION);

    let registry = match MetricsRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };
    let mut sink = metrics_sink(registry, config.output.metrics_port);

    let (tx, rx) = mpsc::channel();

    let ctrlc_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(Event::Close);
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    spawn_stdin_reader(tx);
    print_help();

    let outcome = match cli.backend {
        BackendKind::Mock => run_card(&config, MockBackend::new(), rx, &mut sink),
        #[cfg(feature = "camera")]
        BackendKind::Native => run_card(
            &config,
            qr_auth_card::capture::NokhwaBackend::new(),
            rx,
            &mut sink,
        ),
    };

    if cli.print_metrics {
        if let Some(text) = sink.encode() {
            print!("{}", text);
        }
    }

    match outcome {
        SessionState::Authenticated => info!("Authenticated, exiting"),
        _ => info!("Card closed, exiting"),
    }
}

fn run_card<B: CameraBackend>(
    config: &CardConfig,
    backend: B,
    events: Receiver<Event>,
    sink: &mut MetricsSink,
) -> SessionState {
    let mut card = AuthCard::new(config, backend, QrDecoder::new(), StubVerifier::new());
    let mut last_mode = card.mode();

    let outcome = EventLoop::new(events).run_observed(&mut card, |card| {
        sink.update(&MetricsSnapshot::from_card(card));

        let view = card.view();
        if card.mode() != last_mode {
            last_mode = card.mode();
            println!(
                "mode: {} ({}x{})",
                last_mode,
                view.surface().width,
                view.surface().height
            );
        }
        if let Some(error) = view.error_text() {
            println!("{}", error);
        }
    });

    let stats = card.stats();
    info!(
        "Ticks: {}, frames shown: {}, skipped: {}, decodes: {}, accepted: {}, rejected: {}",
        stats.ticks,
        stats.frames_displayed,
        stats.frames_skipped,
        stats.decodes,
        stats.accepted,
        stats.rejected
    );
    outcome
}

#[cfg(feature = "metrics")]
fn metrics_sink(registry: MetricsRegistry, port: u16) -> MetricsSink {
    use qr_auth_card::metrics::{MetricsServer, MetricsServerConfig};

    if port == 0 {
        return MetricsSink::Local(registry);
    }

    let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
    let state = server.state();
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Failed to start metrics runtime: {}", e);
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            warn!("Metrics server stopped: {}", e);
        }
    });
    MetricsSink::Served(state)
}

#[cfg(not(feature = "metrics"))]
fn metrics_sink(registry: MetricsRegistry, port: u16) -> MetricsSink {
    if port != 0 {
        warn!("Metrics port {} ignored: built without the `metrics` feature", port);
    }
    MetricsSink::Local(registry)
}

fn spawn_stdin_reader(tx: Sender<Event>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(event) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => print_help(),
            }
        }
        // End of input closes the card
        let _ = tx.send(Event::Close);
    });
}

fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim_start();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest),
        None => (line, ""),
    };
    match command {
        "scan" => Some(Event::ScanRequested),
        "back" => Some(Event::BackRequested),
        "submit" => Some(Event::Submit(rest.to_string())),
        "close" | "quit" => Some(Event::Close),
        _ => None,
    }
}

fn print_help() {
    eprintln!("commands: scan | back | submit <password> | close");
}
