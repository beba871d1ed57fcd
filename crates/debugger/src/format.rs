//! Number formatting for panel values.
//!
//! Values print with a fixed number of decimals and `,` thousands separators
//! (`1234.5` at one decimal is `1,234.5`). Digit counts are part of the panel
//! format and must not drift.

use engine_core::Vec3;

/// Decimals for vector components.
pub const VECTOR_DECIMALS: usize = 5;
/// Decimals for scalar readings.
pub const SCALAR_DECIMALS: usize = 3;
/// Decimals for health readings.
pub const HEALTH_DECIMALS: usize = 1;

/// Fixed-point with thousands grouping. A value that rounds to zero is never negative.
pub fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = format!("{:.*}", decimals, round_half_away(value.abs(), decimals));
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };
    let negative = value < 0.0 && digits.bytes().any(|b| matches!(b, b'1'..=b'9'));

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Pushes an exact midpoint at `decimals` up to the next step. The formatter
/// alone would round it to even.
fn round_half_away(magnitude: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = magnitude * scale;
    let exact = magnitude.mul_add(scale, -scaled) == 0.0;
    if exact && scaled.fract() == 0.5 {
        (scaled.trunc() + 1.0) / scale
    } else {
        magnitude
    }
}

/// `grouped` for an `f32` reading.
pub fn grouped_f32(value: f32, decimals: usize) -> String {
    grouped(value as f64, decimals)
}

/// Space-separated components at vector precision.
pub fn vector(v: Vec3) -> String {
    format!(
        "{} {} {}",
        grouped_f32(v.x, VECTOR_DECIMALS),
        grouped_f32(v.y, VECTOR_DECIMALS),
        grouped_f32(v.z, VECTOR_DECIMALS)
    )
}
