use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Library crates that must build without std for Cortex-M.
pub(crate) const NO_STD_CRATES: [&str; 3] = ["panel-hal", "panel-specs", "panel-driver"];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking panel driver builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: host build with every feature the mocks and demo need
    required(
        "host build (std, tracing, serde)",
        &[
            "check",
            "--workspace",
            "--all-targets",
            "--features",
            "panel-driver/std,panel-driver/tracing,panel-driver/serde",
        ],
    )?;

    // Check 2: no_std libraries on the hardware target
    for krate in NO_STD_CRATES {
        required(
            &format!("{krate} (thumbv7em-none-eabihf, defmt)"),
            &[
                "check",
                "-p",
                krate,
                "--target",
                "thumbv7em-none-eabihf",
                "--no-default-features",
                "--features",
                "defmt",
            ],
        )?;
    }

    // Check 3: Clippy lints
    println!("{}", "  Running clippy lints...".cyan());
    let clippy_start = Instant::now();

    let clippy_output = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .output()
        .context("Failed to run clippy")?;

    if clippy_output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ Clippy passed in {:.2}s",
                clippy_start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&clippy_output.stderr));
        // Don't fail on clippy warnings, just show them
    }
    println!();

    // Check 4: Format check
    println!("{}", "  Checking code formatting...".cyan());

    let fmt_output = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .output()
        .context("Failed to run cargo fmt")?;

    if fmt_output.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Run one cargo invocation and fail the whole check if it fails.
fn required(label: &str, args: &[&str]) -> Result<()> {
    println!("{}", format!("  Checking {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to check {label}"))?;

    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} check failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {label} passed in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}
