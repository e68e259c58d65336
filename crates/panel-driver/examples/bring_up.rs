//! Panel Bring-Up Demo
//!
//! Runs the DXQ7D0023 through prepare, enable, a brightness change, disable
//! and unprepare on the recording mocks, then prints the resulting bus trace
//! against the virtual clock.
//!
//! Run with: cargo run -p panel-driver --example bring_up --features std,tracing
//! Set RUST_LOG=trace to see every DSI write from the driver itself.

#![allow(clippy::print_stdout, clippy::use_debug, clippy::arithmetic_side_effects)]

use panel_driver::Panel;
use panel_hal::mocks::{Event, Journal, MockDsiHost, MockRegulator, MockResetPin, VirtualDelay};
use panel_hal::{Brightness, Polarity, ResetPin};
use panel_specs::panels::ICNA3512_DXQ7D0023;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let descriptor = &ICNA3512_DXQ7D0023;
    let journal = Journal::new();
    let rails = descriptor
        .supplies
        .iter()
        .map(|&name| MockRegulator::new(name, &journal))
        .collect::<Vec<_>>();
    let rails: [MockRegulator; 3] = rails
        .try_into()
        .map_err(|_| "descriptor does not list three supplies")?;

    let mut panel = Panel::new(
        descriptor,
        MockDsiHost::new(&journal),
        rails,
        ResetPin::new(MockResetPin::new(&journal), Polarity::ActiveLow),
        VirtualDelay::new(&journal),
    )?;

    if let Some(mode) = descriptor.preferred_mode() {
        tracing::info!(
            "{}: {} @ {} Hz, {} lanes",
            descriptor.name,
            mode,
            mode.vrefresh(),
            descriptor.lanes
        );
    }

    panel.prepare().await?;
    panel.enable().await?;
    panel.set_brightness(Brightness::new(128)).await?;
    tracing::info!("brightness reads back {}", panel.brightness().await?.get());
    panel.disable().await?;
    panel.unprepare().await?;

    println!("\n{:>12}  event", "t (us)");
    for record in journal.records() {
        let at_us = record.at_ns / 1_000;
        match record.event {
            Event::Write {
                data, low_power, ..
            } => println!(
                "{at_us:>12}  write {:02X?}{}",
                data,
                if low_power { " (LP)" } else { "" }
            ),
            Event::Delay { ns } => println!("{at_us:>12}  wait {} us", ns / 1_000),
            other => println!("{at_us:>12}  {other:?}"),
        }
    }
    println!(
        "\ntotal bring-up and teardown: {} ms",
        journal.now_ns() / 1_000_000
    );
    Ok(())
}
