//! Standalone CLI for replaying scripted page input without a browser
//!
//! Run with: cargo run --features cli --bin nivo-cli -- scenario.json

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use nivo_fx::core::{replay, FxConfig, Scenario};
    use tracing::info;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,nivo_fx=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let scenario_path = std::env::args()
        .nth(1)
        .ok_or("usage: nivo-cli <scenario.json>")?;

    let config = match std::env::var("NIVO_FX_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading config");
            FxConfig::load(&path)?
        }
        Err(_) => FxConfig::default(),
    };

    info!(path = %scenario_path, "Loading scenario");
    let scenario = Scenario::load(&scenario_path)?;
    info!(
        blobs = scenario.blobs.len(),
        sections = scenario.sections,
        steps = scenario.steps.len(),
        "Replaying"
    );

    let report = replay(config, &scenario);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
