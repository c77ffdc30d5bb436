//! Battle client binary.
//!
//! # Examples
//!
//! ```bash
//! BATTLE_PLAN=crypt BATTLE_SPEED=3 cargo run -p battle-client
//! RUST_LOG=battle::engine=debug BATTLE_SEED=7 cargo run -p battle-client
//! ```

use anyhow::Result;
use battle_client::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(
        content = %config.content_dir.display(),
        plan = %config.plan,
        speed = config.speed.multiplier(),
        "Starting battle client"
    );

    let result = battle_client::app::run(&config).await?;
    if !result.success {
        tracing::warn!("Run did not succeed: {:?}", result.end);
    }
    Ok(())
}
