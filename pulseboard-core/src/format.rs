//! Formatting helpers shared by report renderers.

/// Format a percent change as "+20.0%", or "N/A" when undefined.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(value) if value.is_finite() => format!("{:+.1}%", value),
        _ => "N/A".to_string(),
    }
}

/// Format a metric value compactly (e.g., "1.2K", "3.4M"), or "N/A".
pub fn format_metric(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return "N/A".to_string();
    };
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(20.0)), "+20.0%");
        assert_eq!(format_change(Some(-12.34)), "-12.3%");
        assert_eq!(format_change(Some(0.0)), "+0.0%");
        assert_eq!(format_change(None), "N/A");
        assert_eq!(format_change(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(Some(0.0)), "0");
        assert_eq!(format_metric(Some(950.0)), "950");
        assert_eq!(format_metric(Some(12.5)), "12.50");
        assert_eq!(format_metric(Some(1_500.0)), "1.5K");
        assert_eq!(format_metric(Some(2_300_000.0)), "2.3M");
        assert_eq!(format_metric(Some(-4_000.0)), "-4.0K");
        assert_eq!(format_metric(None), "N/A");
    }
}
