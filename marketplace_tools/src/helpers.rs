use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The backend is not consistent about the types of the fields it only ever sends for display. Strings are kept as is,
/// null becomes an empty string and anything else is kept as its JSON text.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Ok(other.to_string()),
    }
}

/// Like [`string_or_number`], but keeps null as `None`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Ok(Some(other.to_string())),
    }
}

/// Treats an explicit null the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Epoch seconds, given either as an integer, a float or a numeric string. Fractional seconds are truncated. Anything
/// else is treated as if no timestamp had been sent.
pub fn epoch_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where D: Deserializer<'de> {
    let secs = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(whole_seconds)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(whole_seconds)).or_else(|| {
                if !s.is_empty() {
                    debug!("Ignoring unreadable epoch timestamp '{s}'");
                }
                None
            })
        },
        Some(other) => {
            debug!("Ignoring unreadable epoch timestamp {other}");
            None
        },
    };
    Ok(secs)
}

#[allow(clippy::cast_possible_truncation)]
fn whole_seconds(f: f64) -> Option<i64> {
    (f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f.trunc() as i64)
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::string_or_number")]
        price: String,
        #[serde(default, deserialize_with = "super::epoch_seconds")]
        ts: Option<i64>,
    }

    #[test]
    fn prices_may_be_numbers() {
        let s: Sample = serde_json::from_str(r#"{"price": 125.5, "ts": 1714550400}"#).unwrap();
        assert_eq!(s.price, "125.5");
        assert_eq!(s.ts, Some(1714550400));
        let s: Sample = serde_json::from_str(r#"{"price": "1,250.00"}"#).unwrap();
        assert_eq!(s.price, "1,250.00");
        assert_eq!(s.ts, None);
    }

    #[test]
    fn null_and_fractional_values() {
        let s: Sample = serde_json::from_str(r#"{"price": null, "ts": 1714550400.75}"#).unwrap();
        assert_eq!(s.price, "");
        assert_eq!(s.ts, Some(1714550400));
        let s: Sample = serde_json::from_str(r#"{"ts": "1714550400"}"#).unwrap();
        assert_eq!(s.ts, Some(1714550400));
    }

    #[test]
    fn unreadable_values_do_not_fail_the_record() {
        let s: Sample = serde_json::from_str(r#"{"price": [1], "ts": "yesterday"}"#).unwrap();
        assert_eq!(s.price, "[1]");
        assert_eq!(s.ts, None);
        let s: Sample = serde_json::from_str(r#"{"price": true, "ts": {"seconds": 1}}"#).unwrap();
        assert_eq!(s.price, "true");
        assert_eq!(s.ts, None);
        let s: Sample = serde_json::from_str(r#"{"ts": 1e300}"#).unwrap();
        assert_eq!(s.ts, None);
    }
}
