// Number formatters used for headers and axis labels

/// Duration in seconds as "Hh Mm Ss".
///
/// Minutes only appear below ten hours and seconds only below ten minutes.
/// From 1000 hours on the value collapses to thousands of hours with two
/// significant digits ("1.0k", "12k"). A zero duration renders as "0".
pub fn format_seconds(total_seconds: f64) -> String {
    let total = if total_seconds.is_finite() {
        total_seconds.max(0.0).floor() as u64
    } else {
        0
    };

    let seconds = total % 60;
    let minutes = (total / 60) % 60;
    let hours = total / 3600;

    if hours >= 1000 {
        return format!("{}k", two_significant_digits(hours as f64 / 1000.0));
    }

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if hours < 10 && minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if hours == 0 && minutes < 10 && seconds > 0 {
        parts.push(format!("{seconds}s"));
    }

    if parts.is_empty() {
        "0".to_string()
    } else {
        parts.join(" ")
    }
}

fn two_significant_digits(value: f64) -> String {
    let scientific = format!("{value:.1e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let (Ok(mantissa_value), Ok(exponent)) = (mantissa.parse::<f64>(), exponent.parse::<i32>())
    else {
        return scientific;
    };

    match exponent {
        0 => mantissa.to_string(),
        e if e > 0 => format!("{:.0}", mantissa_value * 10f64.powi(e)),
        e => format!("{:.*}", (1 - e) as usize, value),
    }
}

/// Compact axis label: values over 1000 become "Nk"
pub fn format_compact(value: f64) -> String {
    if value > 1000.0 {
        format!("{}k", (value / 1000.0).round())
    } else {
        value.to_string()
    }
}
