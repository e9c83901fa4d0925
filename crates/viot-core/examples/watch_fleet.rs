//! Example: Watching a Simulated Fleet
//!
//! This example starts a session with fast tickers, selects a device, and
//! prints the selected device's status and readings as ticks arrive.
//!
//! Run with: `cargo run --example watch_fleet -- [SEED]`

use std::env;

use viot_core::{
    DeviceSimConfig, FleetEvent, FleetSummary, NotificationSimConfig, Session, SimulationConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let seed = env::args().nth(1).map(|s| s.parse()).transpose()?;
    let config = SimulationConfig {
        seed,
        devices: DeviceSimConfig {
            tick_interval_secs: 1,
            ..Default::default()
        },
        notifications: NotificationSimConfig {
            check_interval_secs: 2,
            ..Default::default()
        },
        ..Default::default()
    };

    let session = Session::start(&config)?;
    let mut events = session.subscribe();
    let store = session.devices();
    store.set_selected_device(Some("1")).await?;

    for device in store.devices().await {
        println!(
            "{:>3}  {:<24} {:<10} {:<12}",
            device.id, device.name, device.status.as_str(), device.location
        );
    }
    println!();

    let mut ticks = 0;
    while ticks < 10 {
        match events.recv().await? {
            FleetEvent::DevicesTicked { tick, status_changes, .. } => {
                ticks += 1;
                if let Some(device) = store.selected_device().await {
                    println!(
                        "tick {:>2}: {} is {} reading {}{} battery {}%",
                        tick,
                        device.name,
                        device.status,
                        device.last_reading,
                        device.unit(),
                        device.battery_level
                    );
                }
                for change in status_changes {
                    println!("         #{} {} -> {}", change.device_id, change.from, change.to);
                }
            }
            FleetEvent::NotificationCreated { notification } => {
                println!("notice: {}", notification.message);
            }
            _ => {}
        }
    }

    let summary = FleetSummary::from_devices(&store.devices().await);
    println!();
    println!(
        "{} of {} online, average battery {}%, {} reward points",
        summary.online, summary.total, summary.average_battery, summary.total_rewards
    );

    session.shutdown().await;
    Ok(())
}
