//! Value formatting shared by the prompt builder and the report views.
//! Every helper renders a missing value as [`NOT_AVAILABLE`].

pub const NOT_AVAILABLE: &str = "N/A";

/// Plain number with two decimals.
pub fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Price with a dollar sign.
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${:.2}", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Fraction rendered as a percentage (0.0123 -> "1.23%").
pub fn percent_of_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Value that is already a percentage (1.23 -> "+1.23%").
pub fn signed_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:+.2}%", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Large magnitude with a K/M/B/T suffix.
pub fn compact(value: Option<f64>) -> String {
    let v = match value {
        Some(v) if v.is_finite() => v,
        _ => return NOT_AVAILABLE.to_string(),
    };
    let abs = v.abs();
    if abs >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", v / 1e3)
    } else {
        format!("{:.2}", v)
    }
}

/// Money amount with a dollar sign and compact suffix.
pub fn compact_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${}", compact(Some(v))),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Integer count with thousands separators.
pub fn count(value: Option<u64>) -> String {
    let Some(v) = value else {
        return NOT_AVAILABLE.to_string();
    };
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Text value, falling back to `N/A` when absent or blank.
pub fn text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Truncate on a character boundary, appending "..." when shortened.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
