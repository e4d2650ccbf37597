//! Human-readable helpers shared by presentation layers.

const TRILLION: f64 = 1e12;
const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Abbreviate a large amount (`1.5 T`, `2.5 B`, `3.5 M`); `-` when absent.
pub fn format_large_number(value: Option<f64>) -> String {
    let Some(value) = value else {
        return String::from("-");
    };

    if value >= TRILLION {
        format!("{:.1} T", value / TRILLION)
    } else if value >= BILLION {
        format!("{:.1} B", value / BILLION)
    } else if value >= MILLION {
        format!("{:.1} M", value / MILLION)
    } else {
        format!("{value:.2}")
    }
}

/// Fraction rendered as a percentage with two decimals; `-` when absent.
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{:.2}%", v * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_by_magnitude() {
        assert_eq!(format_large_number(Some(1_500_000_000_000.0)), "1.5 T");
        assert_eq!(format_large_number(Some(2_500_000_000.0)), "2.5 B");
        assert_eq!(format_large_number(Some(3_500_000.0)), "3.5 M");
        assert_eq!(format_large_number(Some(100.0)), "100.00");
        assert_eq!(format_large_number(None), "-");
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(format_large_number(Some(1e12)), "1.0 T");
        assert_eq!(format_large_number(Some(999_999.0)), "999999.00");
        assert_eq!(format_large_number(Some(-5e9)), "-5000000000.00");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percent(Some(0.25)), "25.00%");
        assert_eq!(format_percent(None), "-");
    }
}
