use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// One rustdoc pass: crate, feature set, and target (`None` = host).
struct DocBuild {
    krate: &'static str,
    features: &'static str,
    target: Option<&'static str>,
}

/// Every library crate is documented with the features a board build uses
/// and with the host features, so cfg-gated items (mocks, serde impls,
/// `std::error::Error`) must keep their links intact in both.
const BUILDS: [DocBuild; 6] = [
    DocBuild {
        krate: "panel-hal",
        features: "defmt",
        target: Some("thumbv7em-none-eabihf"),
    },
    DocBuild {
        krate: "panel-specs",
        features: "defmt",
        target: Some("thumbv7em-none-eabihf"),
    },
    DocBuild {
        krate: "panel-driver",
        features: "defmt",
        target: Some("thumbv7em-none-eabihf"),
    },
    DocBuild {
        krate: "panel-hal",
        features: "std,serde",
        target: None,
    },
    DocBuild {
        krate: "panel-specs",
        features: "std,serde",
        target: None,
    },
    DocBuild {
        krate: "panel-driver",
        features: "std,serde,tracing",
        target: None,
    },
];

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building panel driver documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    for build in &BUILDS {
        document(build)?;
    }

    // Doc examples only make sense against the host mocks.
    println!("{}", "  Checking doc examples...".cyan());
    let output = Command::new("cargo")
        .args([
            "test",
            "--doc",
            "-p",
            "panel-driver",
            "-p",
            "panel-specs",
            "-p",
            "panel-hal",
            "--features",
            "panel-driver/std,panel-specs/serde",
        ])
        .output()
        .context("Failed to run doc tests")?;
    if !output.status.success() {
        eprintln!("{}", "  ✗ Doc examples failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stdout));
        anyhow::bail!("Doc examples failed");
    }
    println!("{}", "  ✓ Doc examples pass".green());
    println!();

    println!(
        "{}",
        format!(
            "✓ Documentation built in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );

    if open {
        Command::new("cargo")
            .args(["doc", "-p", "panel-driver", "--no-deps", "--features", "std,tracing", "--open"])
            .status()
            .context("Failed to open documentation")?;
    } else {
        println!();
        println!(
            "   {}",
            "Open target/doc/panel_driver/index.html in your browser".dimmed()
        );
        println!(
            "   {}",
            "Or run 'cargo run -p xtask -- doc --open'".dimmed()
        );
    }

    println!();

    Ok(())
}

/// Run rustdoc for one crate, failing on broken intra-doc links.
fn document(build: &DocBuild) -> Result<()> {
    let label = match build.target {
        Some(target) => format!("{} ({target}, {})", build.krate, build.features),
        None => format!("{} (host, {})", build.krate, build.features),
    };
    println!("{}", format!("  Documenting {label}...").cyan());

    let mut cmd = Command::new("cargo");
    cmd.env("RUSTDOCFLAGS", "-D rustdoc::broken_intra_doc_links")
        .args(["doc", "--no-deps", "-p", build.krate])
        .args(["--no-default-features", "--features", build.features]);
    if let Some(target) = build.target {
        cmd.args(["--target", target]);
    }

    let output = cmd
        .output()
        .with_context(|| format!("Failed to document {label}"))?;
    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("Documentation build for {label} failed");
    }

    println!("{}", format!("  ✓ {label}").green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::NO_STD_CRATES;

    #[test]
    fn every_library_is_documented_for_board_and_host() {
        for krate in NO_STD_CRATES {
            let passes: Vec<_> = BUILDS.iter().filter(|b| b.krate == krate).collect();
            assert!(passes.iter().any(|b| b.target.is_some()), "{krate} has no board pass");
            assert!(passes.iter().any(|b| b.target.is_none()), "{krate} has no host pass");
        }
    }

    #[test]
    fn board_passes_stay_off_std() {
        for build in BUILDS.iter().filter(|b| b.target.is_some()) {
            assert!(!build.features.split(',').any(|f| f == "std"), "{}", build.krate);
        }
    }
}
