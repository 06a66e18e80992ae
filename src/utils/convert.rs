use chrono::{DateTime, Utc};

const TRUE_VALUES: &[&str] = &["1", "TRUE", "T", "Y", "YES"];
const FALSE_VALUES: &[&str] = &["0", "FALSE", "F", "N", "NO", "NONE", ""];

/// Decide if `val` spells a true value (`1`, `true`, `t`, `y`, `yes`).
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn is_true(val: &str) -> bool {
    let value = val.trim().to_uppercase();
    TRUE_VALUES.contains(&value.as_str())
}

/// Decide if `val` spells a false value (`0`, `false`, `f`, `n`, `no`,
/// `none` or the empty string).
pub fn is_false(val: &str) -> bool {
    let value = val.trim().to_uppercase();
    FALSE_VALUES.contains(&value.as_str())
}

/// Convert a UTC datetime to seconds since the Unix epoch.
///
/// Sub-second precision is preserved in the fractional part.
pub fn datetime_to_seconds(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_micros()) / 1_000_000.0
}

/// Escape raw control characters in a JSON string payload.
///
/// Splunk's REST endpoints reject raw newlines inside JSON string values;
/// `\r\n` pairs are escaped as a unit so they stay a single line break.
pub fn escape_json_control_chars(json_str: &str) -> String {
    json_str
        .replace("\r\n", "\\r\\n")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_true() {
        for val in ["1", "TRUE", "true", "t", " Y ", "yes", "Yes"] {
            assert!(is_true(val), "expected {val:?} to be true");
        }
        for val in ["0", "false", "no", "", "2", "on"] {
            assert!(!is_true(val), "expected {val:?} to not be true");
        }
    }

    #[test]
    fn test_is_false() {
        for val in ["0", "FALSE", "false", "f", " N ", "no", "none", ""] {
            assert!(is_false(val), "expected {val:?} to be false");
        }
        for val in ["1", "true", "yes", "off", "2"] {
            assert!(!is_false(val), "expected {val:?} to not be false");
        }
    }

    #[test]
    fn test_datetime_to_seconds() {
        let dt = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(datetime_to_seconds(&dt), 0.0);

        let dt = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(datetime_to_seconds(&dt), 1451606400.0);

        let dt = DateTime::from_timestamp(1451606400, 500_000_000).unwrap();
        assert_eq!(datetime_to_seconds(&dt), 1451606400.5);
    }

    #[test]
    fn test_escape_json_control_chars() {
        assert_eq!(escape_json_control_chars("abc"), "abc");
        assert_eq!(escape_json_control_chars("a\nb"), "a\\nb");
        assert_eq!(escape_json_control_chars("a\rb"), "a\\rb");
        assert_eq!(escape_json_control_chars("a\r\nb"), "a\\r\\nb");
    }
}
