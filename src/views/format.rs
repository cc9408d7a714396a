//! Fixed pt-BR formatting: `.` groups thousands, `,` separates decimals

use crate::filters::DATE_FORMAT;
use chrono::NaiveDate;

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `2847650` -> `2.847.650`
pub fn format_number(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// `94.73` with one place -> `94,7`
pub fn format_decimal(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Percentage with one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_decimal(value, 1))
}

/// Change percentage, always signed when non-negative
pub fn format_change(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_percent(value))
    } else {
        format_percent(value)
    }
}

/// Backend date or timestamp -> `dd/mm/yyyy`; unparseable input is returned as is
pub fn format_date(raw: &str) -> String {
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, DATE_FORMAT).ok())
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Chart axis label, `MM/YYYY`
pub fn format_month(year: i32, month: u32) -> String {
    format!("{:02}/{}", month, year)
}
