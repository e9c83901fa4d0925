//! Output formatting utilities for text and JSON output.

use anyhow::Result;
use owo_colors::OwoColorize;
use viot_core::{Device, FleetEvent, FleetSummary, Notification, StatusChange};

use crate::cli::StyleMode;
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        Self {
            no_color: no_color || style == StyleMode::Plain,
            compact: false,
            style,
        }
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Reading with its unit, e.g. `24 °C` or `1` for unitless sensors.
pub fn format_reading(device: &Device) -> String {
    match device.unit() {
        "" => device.last_reading.to_string(),
        unit => format!("{} {}", device.last_reading, unit),
    }
}

/// Device list as a table.
#[must_use]
pub fn format_devices_text(devices: &[Device], opts: &FormatOptions) -> String {
    use tabled::{Table, Tabled};

    if devices.is_empty() {
        return "No devices.\n".to_string();
    }

    #[derive(Tabled)]
    struct DeviceRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        device_type: String,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Reading")]
        reading: String,
        #[tabled(rename = "Battery")]
        battery: String,
        #[tabled(rename = "Location")]
        location: String,
        #[tabled(rename = "Rewards")]
        rewards: u64,
    }

    let rows: Vec<DeviceRow> = devices
        .iter()
        .map(|d| DeviceRow {
            id: d.id.clone(),
            name: if opts.no_color {
                d.name.clone()
            } else {
                format!("{}", d.name.cyan())
            },
            device_type: d.device_type.to_string(),
            status: style::format_status_colored(d.status, opts.no_color),
            reading: format_reading(d),
            battery: style::format_battery_colored(d.battery_level, opts.no_color),
            location: d.location.clone(),
            rewards: d.reward_points,
        })
        .collect();

    let mut table = Table::new(rows);
    style::apply_table_style(&mut table, opts.style);
    format!("{}\n", table)
}

/// Notification feed, one line per entry.
#[must_use]
pub fn format_notifications_text(notifications: &[Notification], opts: &FormatOptions) -> String {
    if notifications.is_empty() {
        return "No notifications.\n".to_string();
    }

    let mut output = String::new();
    for n in notifications {
        let marker = if n.read { " " } else { "*" };
        output.push_str(&format!(
            "{} {} {} ({}, {}): {}\n",
            marker,
            style::format_notification_tag(n.notification_type, opts.no_color),
            n.title,
            n.source,
            n.category,
            n.message
        ));
    }
    output
}

/// Fleet statistics as aligned key/value lines.
#[must_use]
pub fn format_summary_text(summary: &FleetSummary, opts: &FormatOptions) -> String {
    let mut lines = vec![style::format_title("Fleet Summary", opts.no_color)];
    lines.push(format!("{:<18} {}", "Devices:", summary.total));
    lines.push(format!(
        "{:<18} {} online, {} warning, {} offline, {} maintenance",
        "Status:", summary.online, summary.warning, summary.offline, summary.maintenance
    ));
    lines.push(format!("{:<18} {}", "With issues:", summary.devices_with_issues));
    lines.push(format!("{:<18} {}%", "Online:", summary.online_percent));
    lines.push(format!(
        "{:<18} {}",
        "Average battery:",
        style::format_battery_colored(
            u8::try_from(summary.average_battery).unwrap_or(u8::MAX),
            opts.no_color
        )
    ));
    lines.push(format!("{:<18} {}", "Low battery:", summary.low_battery));
    lines.push(format!("{:<18} {}", "Reward points:", summary.total_rewards));

    if !summary.by_type.is_empty() {
        let types: Vec<String> = summary
            .by_type
            .iter()
            .map(|(k, v)| format!("{} {}", k, v))
            .collect();
        lines.push(format!("{:<18} {}", "By type:", types.join(", ")));
    }
    if !summary.by_location.is_empty() {
        let locations: Vec<String> = summary
            .by_location
            .iter()
            .map(|(k, v)| format!("{} {}", k, v))
            .collect();
        lines.push(format!("{:<18} {}", "By location:", locations.join(", ")));
    }

    lines.join("\n") + "\n"
}

fn format_status_change(change: &StatusChange, no_color: bool) -> String {
    format!(
        "#{} {} -> {}",
        change.device_id,
        style::format_status_colored(change.from, no_color),
        style::format_status_colored(change.to, no_color)
    )
}

/// One event as a single text line.
#[must_use]
pub fn format_event_text(event: &FleetEvent, opts: &FormatOptions) -> String {
    let no_color = opts.no_color;
    let line = match event {
        FleetEvent::DevicesSeeded { count } => format!("seeded {} devices", count),
        FleetEvent::DeviceInitFailed { error } => format!("device initialization failed: {}", error),
        FleetEvent::DeviceAdded { device } => {
            format!("added #{} {} ({})", device.id, device.name, device.device_type)
        }
        FleetEvent::DeviceUpdated { device } => format!("updated #{} {}", device.id, device.name),
        FleetEvent::DeviceRemoved { device } => format!("removed #{} {}", device.id, device.name),
        FleetEvent::SelectionChanged { device_id } => match device_id {
            Some(id) => format!("selected #{}", id),
            None => "selection cleared".to_string(),
        },
        FleetEvent::DevicesTicked {
            tick,
            device_count,
            status_changes,
        } => {
            let mut line = format!("tick {}: {} devices updated", tick, device_count);
            if !status_changes.is_empty() {
                let changes: Vec<String> = status_changes
                    .iter()
                    .map(|c| format_status_change(c, no_color))
                    .collect();
                line.push_str(&format!(", {}", changes.join(", ")));
            }
            line
        }
        FleetEvent::NotificationCreated { notification } => format!(
            "{} {}: {}",
            style::format_notification_tag(notification.notification_type, no_color),
            notification.title,
            notification.message
        ),
        FleetEvent::NotificationsRead { ids } => format!("marked {} read", ids.join(", ")),
        FleetEvent::NotificationsDeleted { ids } => format!("deleted {}", ids.join(", ")),
        FleetEvent::Toast(toast) => {
            let tag = style::format_toast_tag(toast.level, no_color);
            match &toast.description {
                Some(description) => format!("{} {}: {}", tag, toast.title, description),
                None => format!("{} {}", tag, toast.title),
            }
        }
        other => format!("{:?}", other),
    };
    line + "\n"
}

/// One event as a single JSON line.
pub fn format_event_json(event: &FleetEvent) -> Result<String> {
    Ok(serde_json::to_string(event)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use viot_core::{
        DeviceRef, DeviceStatus, DeviceType, EventDispatcher, Session, SimulationConfig, Toast,
    };

    fn plain() -> FormatOptions {
        FormatOptions::new(true, StyleMode::Plain)
    }

    async fn fleet() -> Vec<Device> {
        let config = SimulationConfig {
            seed: Some(1),
            ..Default::default()
        };
        let session = Session::detached(&config, EventDispatcher::default()).unwrap();
        session.devices().devices().await
    }

    #[test]
    fn test_plain_style_disables_color() {
        let opts = FormatOptions::new(false, StyleMode::Plain);
        assert!(opts.no_color);
        let opts = FormatOptions::new(false, StyleMode::Rich);
        assert!(!opts.no_color);
    }

    #[test]
    fn test_compact_json() {
        let opts = plain().with_compact(true);
        let json = opts.as_json(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(json, "{\"a\":1}\n");
    }

    #[tokio::test]
    async fn test_device_table_lists_every_device() {
        let devices = fleet().await;
        let text = format_devices_text(&devices, &plain());
        for device in &devices {
            assert!(text.contains(&device.name));
        }
        assert!(text.contains("Battery"));
    }

    #[test]
    fn test_empty_device_table() {
        assert_eq!(format_devices_text(&[], &plain()), "No devices.\n");
    }

    #[tokio::test]
    async fn test_reading_units() {
        let mut device = fleet().await.remove(0);
        device.device_type = DeviceType::Security;
        device.last_reading = 1;
        assert_eq!(format_reading(&device), "1");
        device.device_type = DeviceType::Light;
        device.last_reading = 640;
        assert_eq!(format_reading(&device), "640 lux");
    }

    #[tokio::test]
    async fn test_summary_text() {
        let summary = FleetSummary::from_devices(&fleet().await);
        let text = format_summary_text(&summary, &plain());
        assert!(text.starts_with("Fleet Summary\n"));
        assert!(text.contains("Devices:           12"));
    }

    #[test]
    fn test_tick_event_line() {
        let event = FleetEvent::DevicesTicked {
            tick: 3,
            device_count: 12,
            status_changes: vec![StatusChange {
                device_id: "4".to_string(),
                from: DeviceStatus::Online,
                to: DeviceStatus::Offline,
            }],
        };
        assert_eq!(
            format_event_text(&event, &plain()),
            "tick 3: 12 devices updated, #4 online -> offline\n"
        );
    }

    #[test]
    fn test_toast_event_line() {
        let event = FleetEvent::Toast(Toast::success(
            "Device Added",
            Some("Patio Light has been added to your network".to_string()),
        ));
        assert_eq!(
            format_event_text(&event, &plain()),
            "[OK] Device Added: Patio Light has been added to your network\n"
        );
    }

    #[test]
    fn test_event_json_is_one_line() {
        let event = FleetEvent::DeviceRemoved {
            device: DeviceRef {
                id: "2".to_string(),
                name: "Hall Motion".to_string(),
                device_type: DeviceType::Motion,
            },
        };
        let json = format_event_json(&event).unwrap();
        assert_eq!(json.lines().count(), 1);
        assert!(json.contains("\"type\":\"device_removed\""));
    }
}
