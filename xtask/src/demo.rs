use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

pub fn run(log: &str) -> Result<()> {
    println!();
    println!("{}", "🖥  Running panel bring-up demo...".cyan().bold());
    println!();

    let status = Command::new("cargo")
        .args([
            "run",
            "-p",
            "panel-driver",
            "--example",
            "bring_up",
            "--features",
            "std,tracing",
        ])
        .env("RUST_LOG", log)
        .status()
        .context("Failed to run bring_up example")?;

    if !status.success() {
        anyhow::bail!("bring_up example failed");
    }
    Ok(())
}
