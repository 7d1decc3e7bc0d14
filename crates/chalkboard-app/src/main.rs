//! Chalkboard command-line entry point.

mod cli;
mod script;

use anyhow::Context;
use clap::Parser;
use std::fs;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting Chalkboard");

    let cli = cli::Cli::parse();

    let json = fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script {}", cli.script.display()))?;
    let script = script::Script::from_json(&json)
        .with_context(|| format!("Failed to parse script {}", cli.script.display()))?;

    let replay = script.run();
    log::info!(
        "Replayed {} steps, {} primitives committed",
        script.steps.len(),
        replay.commits.len()
    );

    if cli.log_commits {
        for primitive in &replay.commits {
            log::info!("{}", primitive.to_json()?);
        }
    }

    replay.write_png(&cli.output)?;
    log::info!("Wrote {}", cli.output.display());
    Ok(())
}
