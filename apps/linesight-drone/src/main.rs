use std::env;

use anyhow::Result;
use linesight_ops::init_tracing;
use linesight_types::{config::LinesightConfig, geo::GroundPosition};
use linesight_uplink::{DirectorySource, SyntheticSource, UplinkClient, UplinkRunner};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config();
    init_tracing(&config.ops)?;

    let client = UplinkClient::new(config.uplink.relay_url.clone())?;
    let origin = GroundPosition::new(
        config.uplink.start_position.0,
        config.uplink.start_position.1,
    );

    match config.uplink.frame_dir.clone() {
        Some(dir) => {
            let source = DirectorySource::open(&dir, origin).await?;
            info!("Replaying {} frame(s) from {dir}", source.frame_count());
            UplinkRunner::new(source, client, config.uplink).run().await?;
        }
        None => {
            let source = SyntheticSource::new(
                config.camera.canvas_width,
                config.camera.canvas_height,
                origin,
                config.uplink.drift_per_frame,
            );
            info!("No frame directory configured; rendering synthetic frames");
            UplinkRunner::new(source, client, config.uplink).run().await?;
        }
    }
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
