use chrono::TimeDelta;

/// A duration expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
}

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Largest magnitude accepted, in nanoseconds (the magnitude of `i64::MIN`).
const MAX_MAGNITUDE: u64 = 1 << 63;

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        // U+00B5 micro sign and U+03BC greek small letter mu
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parse a duration expression such as `"300ms"`, `"-1.5h"` or `"2h45m"`.
///
/// The expression is an optional sign followed by one or more decimal numbers, each with
/// an optional fraction and a mandatory unit suffix. Valid units are `ns`, `us` (or `µs`),
/// `ms`, `s`, `m` and `h`. The bare string `"0"` is accepted without a unit. Durations whose
/// magnitude exceeds 2^63 nanoseconds are rejected.
///
/// # Examples
///
/// ```rust
/// use chrono::TimeDelta;
/// use envparse::parse_duration;
///
/// assert_eq!(parse_duration("250ms").unwrap(), TimeDelta::milliseconds(250));
/// assert_eq!(parse_duration("1h30m").unwrap(), TimeDelta::minutes(90));
/// assert!(parse_duration("5").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let invalid = || DurationError::Invalid(input.to_owned());

    let mut s = input;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    if s == "0" {
        return Ok(TimeDelta::zero());
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, rest) = leading_int(s).ok_or_else(invalid)?;
        let has_whole = rest.len() != s.len();
        s = rest;

        let mut fraction = 0;
        let mut scale = 1.0;
        let mut has_fraction = false;
        if let Some(rest) = s.strip_prefix('.') {
            let (f, sc, rest_after) = leading_fraction(rest);
            has_fraction = rest_after.len() != rest.len();
            fraction = f;
            scale = sc;
            s = rest_after;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        let unit_len = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_owned()));
        }
        let (unit, rest) = s.split_at(unit_len);
        s = rest;
        let unit = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_owned(),
            input: input.to_owned(),
        })?;

        if whole > MAX_MAGNITUDE / unit {
            return Err(invalid());
        }
        let mut value = whole * unit;
        if fraction > 0 {
            // Float precision is enough here: the fraction only refines sub-unit digits.
            value += (fraction as f64 * (unit as f64 / scale)) as u64;
            if value > MAX_MAGNITUDE {
                return Err(invalid());
            }
        }

        total = total.checked_add(value).ok_or_else(invalid)?;
        if total > MAX_MAGNITUDE {
            return Err(invalid());
        }
    }

    let nanos = if negative {
        // total == 2^63 maps onto i64::MIN
        (total as i64).wrapping_neg()
    } else {
        i64::try_from(total).map_err(|_| invalid())?
    };
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Consume leading ASCII digits, failing on overflow past 2^63.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    for b in s[..end].bytes() {
        x = x.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        if x > MAX_MAGNITUDE {
            return None;
        }
    }
    Some((x, &s[end..]))
}

/// Consume leading ASCII digits after a decimal point.
///
/// Returns the digits as an integer together with the power of ten they are scaled by.
/// Digits that would overflow are consumed but ignored.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    let mut scale = 1.0;
    let mut overflow = false;
    for b in s[..end].bytes() {
        if overflow {
            continue;
        }
        match x
            .checked_mul(10)
            .and_then(|y| y.checked_add(u64::from(b - b'0')))
            .filter(|y| *y <= i64::MAX as u64)
        {
            Some(y) => {
                x = y;
                scale *= 10.0;
            }
            None => overflow = true,
        }
    }
    (x, scale, &s[end..])
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    mod valid {
        use super::*;

        #[test]
        fn single_units() {
            assert_eq!(parse_duration("10ns").unwrap(), TimeDelta::nanoseconds(10));
            assert_eq!(parse_duration("7us").unwrap(), TimeDelta::microseconds(7));
            assert_eq!(parse_duration("7µs").unwrap(), TimeDelta::microseconds(7));
            assert_eq!(parse_duration("7μs").unwrap(), TimeDelta::microseconds(7));
            assert_eq!(
                parse_duration("250ms").unwrap(),
                TimeDelta::milliseconds(250)
            );
            assert_eq!(parse_duration("5s").unwrap(), TimeDelta::seconds(5));
            assert_eq!(parse_duration("3m").unwrap(), TimeDelta::minutes(3));
            assert_eq!(parse_duration("2h").unwrap(), TimeDelta::hours(2));
        }

        #[test]
        fn zero() {
            assert_eq!(parse_duration("0").unwrap(), TimeDelta::zero());
            assert_eq!(parse_duration("-0").unwrap(), TimeDelta::zero());
            assert_eq!(parse_duration("0s").unwrap(), TimeDelta::zero());
        }

        #[test]
        fn composite() {
            assert_eq!(parse_duration("1h30m").unwrap(), TimeDelta::minutes(90));
            assert_eq!(
                parse_duration("2h45m30.5s").unwrap(),
                TimeDelta::hours(2)
                    + TimeDelta::minutes(45)
                    + TimeDelta::seconds(30)
                    + TimeDelta::milliseconds(500)
            );
            assert_eq!(
                parse_duration("1s1ms1us1ns").unwrap(),
                TimeDelta::nanoseconds(1_001_001_001)
            );
        }

        #[test]
        fn fractions() {
            assert_eq!(parse_duration("1.5h").unwrap(), TimeDelta::minutes(90));
            assert_eq!(parse_duration(".5s").unwrap(), TimeDelta::milliseconds(500));
            assert_eq!(parse_duration("1.s").unwrap(), TimeDelta::seconds(1));
            assert_eq!(
                parse_duration("0.000000001s").unwrap(),
                TimeDelta::nanoseconds(1)
            );
        }

        #[test]
        fn signs() {
            assert_eq!(parse_duration("+5s").unwrap(), TimeDelta::seconds(5));
            assert_eq!(parse_duration("-5s").unwrap(), TimeDelta::seconds(-5));
            assert_eq!(
                parse_duration("-1h30m").unwrap(),
                TimeDelta::minutes(-90)
            );
        }

        #[test]
        fn extremes() {
            assert_eq!(
                parse_duration("9223372036854775807ns").unwrap(),
                TimeDelta::nanoseconds(i64::MAX)
            );
            assert_eq!(
                parse_duration("-9223372036854775808ns").unwrap(),
                TimeDelta::nanoseconds(i64::MIN)
            );
        }
    }

    mod invalid {
        use super::*;

        #[test]
        fn empty_and_signs() {
            assert_eq!(
                parse_duration(""),
                Err(DurationError::Invalid(String::new()))
            );
            assert!(matches!(parse_duration("-"), Err(DurationError::Invalid(_))));
            assert!(matches!(parse_duration("+"), Err(DurationError::Invalid(_))));
        }

        #[test]
        fn missing_unit() {
            assert_eq!(
                parse_duration("5"),
                Err(DurationError::MissingUnit("5".to_owned()))
            );
            assert!(matches!(
                parse_duration("1h30"),
                Err(DurationError::MissingUnit(_))
            ));
        }

        #[test]
        fn unknown_unit() {
            assert_eq!(
                parse_duration("3d"),
                Err(DurationError::UnknownUnit {
                    unit: "d".to_owned(),
                    input: "3d".to_owned(),
                })
            );
            assert!(matches!(
                parse_duration("1 s"),
                Err(DurationError::UnknownUnit { .. })
            ));
        }

        #[test]
        fn malformed_numbers() {
            assert!(matches!(parse_duration("."), Err(DurationError::Invalid(_))));
            assert!(matches!(parse_duration(".s"), Err(DurationError::Invalid(_))));
            assert!(matches!(parse_duration("abc"), Err(DurationError::Invalid(_))));
            assert!(matches!(parse_duration("s5"), Err(DurationError::Invalid(_))));
        }

        #[test]
        fn overflow() {
            assert!(matches!(
                parse_duration("9223372036854775808ns"),
                Err(DurationError::Invalid(_))
            ));
            assert!(matches!(
                parse_duration("3000000h"),
                Err(DurationError::Invalid(_))
            ));
            assert!(matches!(
                parse_duration("9223372036854775807ns1ns"),
                Err(DurationError::Invalid(_))
            ));
        }

        #[test]
        fn display() {
            assert_eq!(
                DurationError::MissingUnit("5".to_owned()).to_string(),
                r#"missing unit in duration "5""#
            );
            assert_eq!(
                DurationError::UnknownUnit {
                    unit: "d".to_owned(),
                    input: "3d".to_owned()
                }
                .to_string(),
                r#"unknown unit "d" in duration "3d""#
            );
        }
    }
}
