//! Fixed-point decimal codec
//!
//! The watch has no FPU, so every metric value is carried as an `i64`
//! scaled by [`FIXED_POINT_SCALE`] (four implied decimal digits). Parsing
//! also reports how many decimals the source text actually had, so that a
//! value can be redisplayed with its original precision ("50" stays "50",
//! "0.0234" stays "0.0234").
//!
//! Parsing is tolerant: it stops at the first character that cannot be
//! part of a number and returns whatever was accumulated.

/// Scale of a fixed-point value: `raw / 10_000` is the decimal number.
pub const FIXED_POINT_SCALE: i64 = 10_000;

/// Number of decimal digits carried by [`FIXED_POINT_SCALE`].
pub const MAX_DECIMALS: u8 = 4;

/// A parsed decimal: scaled value plus significant decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedValue {
    /// Value scaled by [`FIXED_POINT_SCALE`]
    pub raw: i64,
    /// Decimal places present in the source text (0..=4)
    pub decimals: u8,
}

impl FixedValue {
    /// Render with the decimal places recorded at parse time.
    pub fn format(&self) -> String {
        format_fixed_point(self.raw, self.decimals)
    }
}

/// Parse decimal text (`-?digits[.digits]`) into a fixed-point value.
///
/// At most four fractional digits are read; further digits are ignored
/// (truncated, not rounded). A second `.` or any other character ends the
/// scan. Magnitudes beyond `i64` saturate.
pub fn parse_fixed_point(text: &str) -> FixedValue {
    let bytes = text.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut magnitude: i64 = 0;
    let mut decimals: u8 = 0;
    let mut seen_point = false;

    for &byte in digits {
        match byte {
            b'.' if !seen_point => seen_point = true,
            b'0'..=b'9' => {
                magnitude = magnitude
                    .saturating_mul(10)
                    .saturating_add(i64::from(byte - b'0'));
                if seen_point {
                    decimals += 1;
                    if decimals >= MAX_DECIMALS {
                        break;
                    }
                }
            }
            _ => break,
        }
    }

    for _ in decimals..MAX_DECIMALS {
        magnitude = magnitude.saturating_mul(10);
    }

    FixedValue {
        raw: if negative { -magnitude } else { magnitude },
        decimals,
    }
}

/// Format a fixed-point value with exactly `decimals` fractional digits.
///
/// `decimals` above four is treated as four. Zero decimals prints the
/// integer part only; the fractional part is truncated toward zero.
pub fn format_fixed_point(value: i64, decimals: u8) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    let scale = FIXED_POINT_SCALE as u64;

    let integer_part = magnitude / scale;
    if decimals == 0 {
        return format!("{sign}{integer_part}");
    }

    let divisor = 10u64.pow(u32::from(MAX_DECIMALS - decimals));
    let frac_part = (magnitude % scale) / divisor;
    format!(
        "{sign}{integer_part}.{frac_part:0width$}",
        width = usize::from(decimals)
    )
}
