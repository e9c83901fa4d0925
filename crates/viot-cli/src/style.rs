//! Visual styling utilities for the CLI.
//!
//! Colors follow the dashboard: green for healthy, yellow for degraded, red
//! for failed, blue for maintenance.

use owo_colors::OwoColorize;
use viot_core::{BatteryBand, DeviceStatus, NotificationType, ToastLevel};

use crate::cli::StyleMode;

/// Format a device status with its color.
pub fn format_status_colored(status: DeviceStatus, no_color: bool) -> String {
    let label = status.as_str();
    if no_color {
        return label.to_string();
    }
    match status {
        DeviceStatus::Online => format!("{}", label.green()),
        DeviceStatus::Offline => format!("{}", label.red()),
        DeviceStatus::Warning => format!("{}", label.yellow()),
        DeviceStatus::Maintenance => format!("{}", label.blue()),
    }
}

/// Format battery percentage with appropriate color.
pub fn format_battery_colored(percent: u8, no_color: bool) -> String {
    if no_color {
        return format!("{}%", percent);
    }
    match BatteryBand::from_level(percent) {
        BatteryBand::Critical => format!("{}%", percent.red()),
        BatteryBand::Low => format!("{}%", percent.yellow()),
        BatteryBand::Normal => format!("{}%", percent.green()),
    }
}

/// Short tag for a notification type.
pub fn format_notification_tag(kind: NotificationType, no_color: bool) -> String {
    let tag = match kind {
        NotificationType::Info => "[--]",
        NotificationType::Warning => "[!!]",
        NotificationType::Success => "[OK]",
        NotificationType::Error => "[XX]",
    };
    if no_color {
        return tag.to_string();
    }
    match kind {
        NotificationType::Info => format!("{}", tag.cyan()),
        NotificationType::Warning => format!("{}", tag.yellow()),
        NotificationType::Success => format!("{}", tag.green()),
        NotificationType::Error => format!("{}", tag.red()),
    }
}

/// Short tag for a toast level.
pub fn format_toast_tag(level: ToastLevel, no_color: bool) -> String {
    let kind = match level {
        ToastLevel::Success => NotificationType::Success,
        ToastLevel::Info => NotificationType::Info,
        ToastLevel::Error => NotificationType::Error,
    };
    format_notification_tag(kind, no_color)
}

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    let rule = "━".repeat(title.chars().count());
    if no_color {
        format!("{}\n{}", title, rule)
    } else {
        format!("{}\n{}", title.bold(), rule.dimmed())
    }
}

/// Apply table style based on StyleMode.
pub fn apply_table_style(table: &mut tabled::Table, style: StyleMode) {
    use tabled::settings::Style;
    match style {
        StyleMode::Rich => {
            table.with(Style::rounded());
        }
        StyleMode::Plain => {
            table.with(Style::blank());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_status() {
        assert_eq!(format_status_colored(DeviceStatus::Warning, true), "warning");
    }

    #[test]
    fn test_colored_status_contains_label() {
        let s = format_status_colored(DeviceStatus::Online, false);
        assert!(s.contains("online"));
        assert!(s.contains('\x1b'));
    }

    #[test]
    fn test_plain_battery() {
        assert_eq!(format_battery_colored(15, true), "15%");
        assert!(format_battery_colored(15, false).contains("15"));
    }

    #[test]
    fn test_toast_tags() {
        assert_eq!(format_toast_tag(ToastLevel::Success, true), "[OK]");
        assert_eq!(format_toast_tag(ToastLevel::Error, true), "[XX]");
    }

    #[test]
    fn test_title_rule_matches_width() {
        let title = format_title("Fleet Summary", true);
        let lines: Vec<_> = title.lines().collect();
        assert_eq!(lines[1].chars().count(), "Fleet Summary".len());
    }
}
