//! Display formatting helpers for the shell layer.

/// Format a floating-point number with thousands separators and a fixed
/// number of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(180.0, 0), "180");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    let factor = 10_f64.powi(decimals as i32);
    let rounded = (abs_value * factor).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac = rounded - rounded.trunc();
        let frac_str = format!("{:.prec$}", frac, prec = decimals as usize);
        // `frac_str` is "0.xx"; keep only the ".xx" part.
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{result}")
    } else {
        result
    }
}

/// Format an ECTS credit amount.
///
/// Whole values render without decimals, fractional ones with a single
/// decimal place.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_credits;
///
/// assert_eq!(format_credits(5.0), "5");
/// assert_eq!(format_credits(7.5), "7.5");
/// ```
pub fn format_credits(credits: f64) -> String {
    if (credits - credits.round()).abs() < 1e-9 {
        format_number(credits, 0)
    } else {
        format_number(credits, 1)
    }
}

/// Format a grade with one decimal place, or a dash when absent.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_grade;
///
/// assert_eq!(format_grade(Some(2.0)), "2.0");
/// assert_eq!(format_grade(None), "—");
/// ```
pub fn format_grade(grade: Option<f64>) -> String {
    match grade {
        Some(g) => format!("{g:.1}"),
        None => "—".to_string(),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::percentage;
///
/// assert!((percentage(20.0, 180.0, 1) - 11.1).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Insert thousands separators into a bare digit string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}
