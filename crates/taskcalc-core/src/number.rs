//! Lenient number parsing and fixed-point formatting.
//!
//! Form fields hold free text, so parsing reads the longest numeric prefix and
//! ignores whatever follows it, the way browsers read `<input>` values.
//! Formatting rounds the exact binary value half away from zero, so a value
//! printed here matches what the browser shows for the same field.

/// Digits kept beyond the requested precision before rounding. Enough to
/// decide every tie exactly for f64 magnitudes a form can hold.
const GUARD_DIGITS: usize = 25;

/// Magnitude from which fixed notation gives way to exponent notation.
const FIXED_LIMIT: f64 = 1e21;

/// Parses the longest numeric prefix of `text`.
///
/// Leading whitespace is skipped. Accepts an optional sign followed by either
/// `Infinity` or a decimal literal with optional fraction and exponent.
/// Returns `None` when no prefix parses.
///
/// ```
/// use taskcalc_core::number::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("  12.5kg"), Some(12.5));
/// assert_eq!(parse_float_prefix(".5"), Some(0.5));
/// assert_eq!(parse_float_prefix("1e2x"), Some(100.0));
/// assert_eq!(parse_float_prefix("abc"), None);
/// ```
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start_matches(is_js_whitespace);
    let bytes = s.as_bytes();
    let mut i = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if s[i..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[i..]);
    let int_part = &s[i..i + int_digits];
    i += int_digits;

    let mut frac_part = "";
    if bytes.get(i) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            frac_part = &s[i + 1..i + 1 + frac_digits];
            i += 1 + frac_digits;
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut literal = String::with_capacity(i + 4);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }

    // Exponent only counts with at least one digit after the marker.
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j..]);
        if exp_digits > 0 {
            literal.push('e');
            literal.push_str(&s[i + 1..j + exp_digits]);
        }
    }

    literal.parse::<f64>().ok()
}

/// Whitespace and line terminators skipped before a number. Narrower than
/// `char::is_whitespace`, which also accepts U+0085.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'
            | '\u{b}'
            | '\u{c}'
            | ' '
            | '\u{a0}'
            | '\u{feff}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\n'
            | '\r'
            | '\u{2028}'
            | '\u{2029}'
    )
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parses a field value, treating anything unusable as zero.
///
/// Empty text, text without a numeric prefix, NaN and negative zero all come
/// back as `0.0`.
pub fn number_or_zero(text: &str) -> f64 {
    match parse_float_prefix(text) {
        Some(v) if !v.is_nan() && v != 0.0 => v,
        _ => 0.0,
    }
}

/// Formats `value` with exactly `digits` fractional digits.
///
/// Ties in the exact binary value round away from zero. Negative values keep
/// their sign even when the result is all zeros. Non-finite values print as
/// `NaN`, `Infinity` and `-Infinity`; magnitudes of 1e21 and above use
/// exponent notation.
///
/// ```
/// use taskcalc_core::number::to_fixed;
///
/// assert_eq!(to_fixed(30.0, 2), "30.00");
/// assert_eq!(to_fixed(0.125, 2), "0.13");
/// assert_eq!(to_fixed(1.005, 2), "1.00");
/// ```
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.abs() >= FIXED_LIMIT {
        return exponent_form(value);
    }

    let negative = value < 0.0;
    let exact = format!("{:.*}", digits + GUARD_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part.bytes().collect();
    kept.extend(frac_part.bytes().take(digits));

    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        increment(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|b| *b as char));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|b| *b as char));
    }
    out
}

fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

fn exponent_form(value: f64) -> String {
    let s = format!("{value:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}
