//! Number formatting for report lines.

/// Format a money amount as `$1,234.56` (negative amounts as `-$1.00`).
pub fn currency(value: f64) -> String {
    let digits = group_thousands(&format!("{:.2}", value.abs()));
    let is_zero = digits.chars().all(|c| matches!(c, '0' | '.' | ','));
    if value < 0.0 && !is_zero {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

/// Format a percentage with exactly one decimal place.
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// `part / whole * 100`, or `None` when `whole` is zero.
pub fn share(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        None
    } else {
        Some(part / whole * 100.0)
    }
}

/// Insert comma separators into the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}
