//! Value Formatter
//! Display strings for KPI values and percent changes.

use serde::{Deserialize, Serialize};

use crate::stats::Direction;

/// Placeholder shown wherever a value is unavailable.
pub const UNAVAILABLE: &str = "-";

/// Rendering policy of a KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// One decimal place
    #[default]
    Fixed,
    /// One decimal place with a K/M/B suffix for large magnitudes
    Scaled,
}

impl ValueFormat {
    pub fn format(self, value: Option<f64>) -> String {
        match self {
            ValueFormat::Fixed => format_fixed(value),
            ValueFormat::Scaled => format_scaled(value),
        }
    }
}

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

pub fn format_fixed(value: Option<f64>) -> String {
    match defined(value) {
        Some(v) => format!("{v:.1}"),
        None => UNAVAILABLE.to_string(),
    }
}

pub fn format_scaled(value: Option<f64>) -> String {
    let Some(v) = defined(value) else {
        return UNAVAILABLE.to_string();
    };

    let magnitude = v.abs();
    if magnitude >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{v:.1}")
    }
}

/// Signed percent string such as `+10.0%` or `-3.2%`, with its direction.
pub fn format_percent_change(percent_change: f64) -> (String, Direction) {
    let direction = Direction::of(percent_change);
    let sign = match direction {
        Direction::NonNegative => "+",
        Direction::Negative => "",
    };
    (format!("{sign}{percent_change:.1}%"), direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed() {
        assert_eq!(format_fixed(Some(999.0)), "999.0");
        assert_eq!(format_fixed(Some(1_234_567.0)), "1234567.0");
        assert_eq!(format_fixed(Some(-2.26)), "-2.3");
        assert_eq!(format_fixed(None), "-");
        assert_eq!(format_fixed(Some(f64::NAN)), "-");
    }

    #[test]
    fn test_scaled_boundaries() {
        assert_eq!(format_scaled(Some(999.0)), "999.0");
        assert_eq!(format_scaled(Some(1_000.0)), "1.0K");
        assert_eq!(format_scaled(Some(999_999.0)), "1000.0K");
        assert_eq!(format_scaled(Some(1_000_000.0)), "1.0M");
        assert_eq!(format_scaled(Some(2_500_000_000.0)), "2.5B");
        assert_eq!(format_scaled(None), "-");
    }

    #[test]
    fn test_scaled_negative_uses_magnitude() {
        assert_eq!(format_scaled(Some(-2_500.0)), "-2.5K");
        assert_eq!(format_scaled(Some(-12.0)), "-12.0");
    }

    #[test]
    fn test_value_format_dispatch() {
        assert_eq!(ValueFormat::Fixed.format(Some(2_500.0)), "2500.0");
        assert_eq!(ValueFormat::Scaled.format(Some(2_500.0)), "2.5K");
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(
            format_percent_change(10.0),
            ("+10.0%".to_string(), Direction::NonNegative)
        );
        assert_eq!(
            format_percent_change(-10.0),
            ("-10.0%".to_string(), Direction::Negative)
        );
        assert_eq!(
            format_percent_change(0.0),
            ("+0.0%".to_string(), Direction::NonNegative)
        );
        assert_eq!(
            format_percent_change(25.0),
            ("+25.0%".to_string(), Direction::NonNegative)
        );
    }
}
