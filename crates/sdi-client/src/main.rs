//! Headless SDI client.
//!
//! Connects to a game server, mirrors its state and logs what happens until
//! the session faults. Network I/O runs on a small tokio runtime; the tick
//! loop runs on the main thread.

use std::process::ExitCode;

use clap::Parser;
use sdi_client::prelude::*;
use tracing_subscriber::EnvFilter;

/// Frames between entity-count log lines.
const ENTITY_LOG_INTERVAL: u64 = 300;

#[derive(Parser, Debug)]
#[command(name = "sdi-client")]
#[command(about = "Super Duck Invaders multiplayer client")]
struct Args {
    /// Server host name or address.
    host: String,

    /// Server port.
    port: Option<u16>,

    /// Simulation ticks per second.
    #[arg(long)]
    tick_rate: Option<u32>,

    /// JSON config file. Command-line values override it.
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<ClientConfig, ClientError> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| {
                    ClientError::ConfigRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                let mut config: ClientConfig = serde_json::from_str(&json)?;
                config.host = self.host.clone();
                config
            }
            None => ClientConfig::new(self.host.clone()),
        };
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(rate) = self.tick_rate {
            config.tick_rate_hz = rate;
        }
        config.validated()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "client stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ClientError> {
    let config = args.into_config()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("sdi-net")
        .enable_all()
        .build()
        .map_err(ClientError::Runtime)?;

    tracing::info!(
        server = %config.addr(),
        tick_rate_hz = config.tick_rate_hz,
        "starting client"
    );

    let mut client = GameClient::connect(&config, runtime.handle());
    let mut clock = FrameClock::new(config.tick_rate_hz);
    let mut phase = client.session().phase();
    let mut hud = *client.session().hud();
    tracing::info!(status = %client.session().status().text, "session");

    loop {
        let frame = clock.wait();
        client.tick();
        clock.end_frame();

        let session = client.session();
        if session.phase() != phase {
            phase = session.phase();
            tracing::info!(?phase, status = %session.status().text, "session changed");
        }
        if *session.hud() != hud {
            hud = *session.hud();
            tracing::debug!(
                health = hud.health,
                flight_charge = hud.flight_charge,
                powerups = ?hud.powerup_charges,
                "hud updated"
            );
        }
        if frame.frame % ENTITY_LOG_INTERVAL == 0 {
            tracing::debug!(
                frame = frame.frame,
                entities = client.registry().len(),
                "world"
            );
        }

        if let Some(message) = client.fault_message() {
            return Err(ClientError::Faulted(message.to_string()));
        }
    }
}
