use serde_json::{Number, Value};

use crate::encoding::to_canonical_string;

/// Decimal places kept by every float in a canonical document.
pub const ROUND_PLACES: usize = 6;

/// Schema tag written into documents that omit `version`.
pub const SCHEMA_VERSION: &str = "gkpo-1.0";

/// Rounds through fixed-point text with [`ROUND_PLACES`] fractional digits.
///
/// `{:.6}` expands the exact binary value and breaks exact ties to even,
/// matching `"{:.6f}"` formatting used by existing canonical corpora.
/// Negative zero collapses to `0.0`.
pub fn round_f64(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let rounded = format!("{:.*}", ROUND_PLACES, x)
        .parse::<f64>()
        .unwrap_or(x);
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds a float scalar; integers and non-numbers are returned unchanged.
///
/// Numbers keep their written form, so an integer literal of any width is
/// never routed through `f64`.
pub fn round_value(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .map(round_f64)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

/// Recursively rounds every float inside objects and arrays.
pub fn round_all(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), round_all(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(round_all).collect()),
        other => round_value(other),
    }
}

/// Coerces a scalar to a float the way a numeric cast would.
///
/// Accepts numbers, numeric strings (surrounding whitespace ignored) and
/// booleans. Returns `None` for anything else.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Formats a float with the shortest round-trip digits.
///
/// Fixed notation is used for decimal exponents in `[-4, 16)`, always with a
/// fractional part (`2.0`, `0.0001`). Outside that window the exponent form
/// carries an explicit sign and at least two digits (`1e-05`, `1.5e+16`).
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let sign = if x < 0.0 { "-" } else { "" };
    let sci = shortest_exact(x.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => match e.parse::<i32>() {
            Ok(e) => (m, e),
            Err(_) => return x.to_string(),
        },
        None => return x.to_string(),
    };

    if !(-4..16).contains(&exp) {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exp.abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    // Position of the decimal point relative to the first digit.
    let point = exp + 1;
    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else {
        let point = point as usize;
        if point >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point - digits.len()))
        } else {
            format!("{}.{}", &digits[..point], &digits[point..])
        }
    };
    format!("{sign}{body}")
}

/// Shortest round-trip digit count, re-rendered at that precision.
///
/// `{:e}` picks the digit count but breaks ties between two equally close
/// shortest spellings upward; the exact-precision path breaks them to even.
fn shortest_exact(x: f64) -> String {
    let shortest = format!("{:e}", x);
    let mantissa = shortest.split('e').next().unwrap_or(&shortest);
    let digits = mantissa.chars().filter(char::is_ascii_digit).count();
    format!("{:.*e}", digits.saturating_sub(1), x)
}

/// Exact text of a non-float number.
///
/// Integers keep every written digit, including ones wider than 64 bits;
/// `-0` reads as `0`. Out-of-range float literals spell like floats.
pub fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let text = n.to_string();
    if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return text;
    }
    n.as_f64().map(format_float).unwrap_or(text)
}

/// Textual form of a scalar used as a sort key or list member.
///
/// Strings are returned verbatim; other values use their printed form
/// (`True`, `None`, shortest floats, compact JSON for composites).
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_float(f),
            _ => number_text(n),
        },
        composite => to_canonical_string(composite),
    }
}
