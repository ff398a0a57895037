use env_logger::{Env, Target};
use std::fs::OpenOptions;

const LOG_FILENAME: &str = "resonance.log";

/// The terminal belongs to the UI, so log records go to a file.
fn init_logging() -> anyhow::Result<()> {
    let path = resonance::app_dir()?.join(LOG_FILENAME);
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    init_logging()?;
    resonance::app_core::Resonance::new()?.run()?;
    Ok(())
}
