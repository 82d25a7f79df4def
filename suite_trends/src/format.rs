use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::data::EpochMillis;

fn utc(ms: EpochMillis) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Compact day label, e.g. `Jul 01, 09:30`.
pub fn format_day(ms: EpochMillis) -> String {
    utc(ms)
        .map(|dt| dt.format("%b %d, %H:%M").to_string())
        .unwrap_or_default()
}

/// `(DD Mon, HH:MM)`, used to stack table headers over two lines.
pub fn split_day_time(ms: EpochMillis) -> (String, String) {
    utc(ms)
        .map(|dt| (dt.format("%d %b").to_string(), dt.format("%H:%M").to_string()))
        .unwrap_or_default()
}

/// `Run: 01 Jul 09:30`
pub fn tooltip_run_label(ms: EpochMillis) -> String {
    let (day, time) = split_day_time(ms);
    format!("Run: {day} {time}")
}

/// `Xh Ym` from one hour on, `Ym` below. Minutes are rounded.
pub fn format_minutes(minutes: f64) -> String {
    let total = if minutes.is_finite() {
        minutes.max(0.0).round() as u64
    } else {
        0
    };
    match (total / 60, total % 60) {
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassBand {
    Healthy,
    Warning,
    Critical,
}

impl PassBand {
    pub fn of(pct: f64) -> PassBand {
        if pct > 90.0 {
            PassBand::Healthy
        } else if pct > 70.0 {
            PassBand::Warning
        } else {
            PassBand::Critical
        }
    }
}

impl Display for PassBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PassBand::Healthy => "healthy",
            PassBand::Warning => "warning",
            PassBand::Critical => "critical",
        })
    }
}

/// Value of a chart cell, `-` when the kind had no run at that instant.
pub fn chart_value(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_helpers::july_ms;

    #[test]
    fn test_day_labels() {
        let ms = july_ms(1, 9) + 30 * 60 * 1000;
        assert_eq!(format_day(ms), "Jul 01, 09:30");
        assert_eq!(split_day_time(ms), ("01 Jul".to_string(), "09:30".to_string()));
        assert_eq!(tooltip_run_label(ms), "Run: 01 Jul 09:30");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0.0), "0m");
        assert_eq!(format_minutes(42.4), "42m");
        assert_eq!(format_minutes(59.6), "1h 0m");
        assert_eq!(format_minutes(125.0), "2h 5m");
        assert_eq!(format_minutes(-3.0), "0m");
        assert_eq!(format_minutes(f64::NAN), "0m");
    }

    #[test]
    fn test_pass_band_thresholds() {
        assert_eq!(PassBand::of(100.0), PassBand::Healthy);
        assert_eq!(PassBand::of(90.5), PassBand::Healthy);
        assert_eq!(PassBand::of(90.0), PassBand::Warning);
        assert_eq!(PassBand::of(70.1), PassBand::Warning);
        assert_eq!(PassBand::of(70.0), PassBand::Critical);
        assert_eq!(PassBand::of(0.0), PassBand::Critical);
        assert_eq!(PassBand::of(95.0).to_string(), "healthy");
    }

    #[test]
    fn test_chart_value() {
        assert_eq!(chart_value(None, |v| format!("{v:.1}")), "-");
        assert_eq!(chart_value(Some(0.0), |v| format!("{v:.1}")), "0.0");
    }
}
