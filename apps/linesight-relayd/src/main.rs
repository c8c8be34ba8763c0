use std::env;

use anyhow::Result;
use linesight_ops::{init_tracing, EventJournal};
use linesight_projection::GroundProjector;
use linesight_relay::{FlushBroadcaster, RelayState};
use linesight_server::{serve, AppState};
use linesight_types::config::LinesightConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = load_config();
    apply_port_override(&mut config);
    init_tracing(&config.ops)?;

    let projector = GroundProjector::new(&config.camera);
    let (footprint_w, footprint_h) = projector.footprint();
    info!(
        "Ground footprint at {:.0} m altitude: {:.1} m x {:.1} m",
        config.camera.altitude_m, footprint_w, footprint_h
    );

    let state = AppState::new(
        RelayState::new(projector),
        FlushBroadcaster::new(64),
        EventJournal::new(),
        &config,
    );
    serve(&config.server, state).await?;
    Ok(())
}

fn load_config() -> LinesightConfig {
    let from_env = env::var("LINESIGHT_CONFIG").ok();
    let from_args = env::args().nth(1);
    let path = from_args
        .or(from_env)
        .unwrap_or_else(|| "configs/dev.toml".into());
    match LinesightConfig::from_file(&path) {
        Ok(cfg) => {
            if let Err(err) = cfg.validate() {
                eprintln!("Invalid config in '{path}': {err}. Falling back to internal defaults.");
                LinesightConfig::default()
            } else {
                cfg
            }
        }
        Err(err) => {
            eprintln!(
                "Failed to load config from '{path}': {err}. Falling back to internal defaults."
            );
            LinesightConfig::default()
        }
    }
}

/// The deployment environment may dictate the listening port.
fn apply_port_override(config: &mut LinesightConfig) {
    let Ok(raw) = env::var("PORT") else { return };
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => config.server.port = port,
        _ => eprintln!("Ignoring invalid PORT value '{raw}'"),
    }
}
