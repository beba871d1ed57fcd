//! Headless sandbox for the entity debugger.
//!
//! Builds a small scene, wires it to the debugger as its host and plays a
//! scripted session. Run with `RUST_LOG=debug` to see every frame.

mod config;
mod demo;
mod host;
mod scene;

use anyhow::Result;
use config::SandboxConfig;
use demo::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SandboxConfig::load();
    log::info!(
        "Starting entity debugger sandbox ({}x{}, toggle {:?}, aim {:?})",
        config.window_width,
        config.window_height,
        config.controls.toggle,
        config.controls.aim
    );

    let mut session = Session::new(&config);
    let report = session.run()?;

    log::info!(
        "Session finished: {} frames, {} with a panel, lock dropped at {:?}",
        report.frames,
        report.rendered_frames,
        report.lost_at
    );
    for message in &report.notifications {
        log::info!("Notification: {}", message);
    }
    Ok(())
}
