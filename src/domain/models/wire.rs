//! Lenient readers for loosely typed values coming off the wire. The service
//! is not consistent about sending integers as `<int>` or as strings.

use serde::de::Error;
use serde::Deserialize;
use serde::Deserializer;
use serde_json::Value;

pub fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(num) => return num.as_i64(),
        Value::String(text) => return text.trim().parse::<i64>().ok(),
        _ => return None,
    }
}

pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => return Some(*flag),
        _ => return to_integer(value).map(|num| return num != 0),
    }
}

pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    return to_integer(&value)
        .ok_or_else(|| return D::Error::custom(format!("expected an integer, found {value}")));
}
