// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 终端输出格式

use crate::domain::models::{GeoRecord, HistoryEntry};
use chrono::{DateTime, TimeZone, Utc};
use colored::Colorize;
use std::fmt::Display;

/// 位置卡片
pub fn location_card(record: &GeoRecord) -> String {
    let mut lines = vec![format!("{} {}", "📍".bold(), record.ip.bold().cyan())];

    if let Some(label) = record.location_label() {
        lines.push(format!("  {}", label.bold()));
    }

    let fields = [
        ("Country", record.country.clone()),
        ("Coordinates", record.coordinates.map(|c| c.to_string())),
        ("Postal", record.postal_code.clone()),
        ("Timezone", record.timezone.clone()),
        ("Organization", record.organization.clone()),
    ];
    for (label, value) in fields {
        let value = value.unwrap_or_else(|| "N/A".to_string());
        lines.push(format!("  {:<14}{}", format!("{}:", label).dimmed(), value));
    }

    lines.join("\n")
}

/// 历史时间的相对描述
///
/// 与 `now` 相差不足一天显示 "Today HH:MM"，一天显示 "Yesterday"，
/// 一周以内显示 "Nd ago"，更早的显示日期
pub fn relative_time<Tz>(at: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let days = (now - at).num_days();
    let local = at.with_timezone(tz);
    match days {
        d if d <= 0 => format!("Today {}", local.format("%H:%M")),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{}d ago", d),
        _ => local.format("%Y-%m-%d").to_string(),
    }
}

/// 历史列表
///
/// `with_selection` 为真时每行前显示选择框
pub fn history_list<Tz>(
    entries: &[HistoryEntry],
    now: DateTime<Utc>,
    tz: &Tz,
    with_selection: bool,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if entries.is_empty() {
        return format!("{} No search history yet", "ℹ".bold().blue());
    }

    let mut lines = Vec::with_capacity(entries.len() + 2);
    for entry in entries {
        let mut parts = Vec::new();
        if with_selection {
            parts.push(if entry.selected { "[x]" } else { "[ ]" }.to_string());
        }
        parts.push(format!("{:<20}", entry.id.to_string()).dimmed().to_string());
        parts.push(format!("{:<15}", entry.ip).cyan().to_string());

        let place = match (entry.geo.city.as_deref(), entry.geo.country.as_deref()) {
            (Some(city), Some(country)) => format!("{}, {}", city, country),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => "Unknown location".to_string(),
        };
        parts.push(place);
        parts.push(
            format!("({})", relative_time(entry.captured_at, now, tz))
                .dimmed()
                .to_string(),
        );

        lines.push(format!("  {}", parts.join(" ")));
    }

    let selected = entries.iter().filter(|e| e.selected).count();
    lines.push(String::new());
    if with_selection && selected > 0 {
        lines.push(format!(
            "{} {} entries, {} selected",
            "ℹ".bold().blue(),
            entries.len().to_string().green(),
            selected
        ));
    } else {
        lines.push(format!(
            "{} {} entries",
            "ℹ".bold().blue(),
            entries.len().to_string().green()
        ));
    }

    lines.join("\n")
}
