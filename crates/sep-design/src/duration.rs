use sep_core::errors::{ErrorInfo, SepError};
use serde_json::Value;

fn unit_seconds(unit: &str) -> Option<f64> {
    let seconds = match unit.to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "min" | "mins" | "minute" | "minutes" => 60.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600.0,
        "d" | "day" | "days" => 86_400.0,
        "w" | "week" | "weeks" => 604_800.0,
        _ => return None,
    };
    Some(seconds)
}

fn invalid(value: &Value, why: &str) -> SepError {
    SepError::Config(
        ErrorInfo::new("invalid-duration", format!("invalid duration {value}: {why}"))
            .with_hint("use seconds or \"<value> <unit>\" with s, min, h, day, or week"),
    )
}

/// Duration in seconds from a number of seconds or a `"<value> <unit>"` string.
pub fn parse_duration(value: &Value) -> Result<f64, SepError> {
    let seconds = match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| invalid(value, "not a number"))?,
        Value::String(text) => {
            let mut parts = text.split_whitespace();
            let (Some(amount), unit, None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(invalid(value, "expected \"<value> <unit>\""));
            };
            let amount: f64 = amount
                .parse()
                .map_err(|_| invalid(value, "amount is not a number"))?;
            let factor = match unit {
                Some(unit) => unit_seconds(unit).ok_or_else(|| invalid(value, "unknown unit"))?,
                None => 1.0,
            };
            amount * factor
        }
        _ => return Err(invalid(value, "expected a number or a string")),
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid(value, "must be finite and non-negative"));
    }
    Ok(seconds)
}
