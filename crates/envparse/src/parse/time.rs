use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, ParseError,
    format::ParseErrorKind,
};

/// Parse `input` as a timestamp laid out according to the strftime `format`.
///
/// The format does not need to describe a complete instant:
///
/// - without an offset (`%z`, `%:z`, ...) the timestamp is taken to be in UTC;
/// - without time fields the result is midnight of that date;
/// - without date fields the result is that time of day on 0000-01-01.
///
/// # Examples
///
/// ```rust
/// use envparse::parse_time;
///
/// let t = parse_time("%Y-%m-%d %H:%M", "2024-02-29 13:45").unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-02-29T13:45:00+00:00");
///
/// let t = parse_time("%Y-%m-%dT%H:%M:%S%:z", "2024-02-29T13:45:00+09:00").unwrap();
/// assert_eq!(t.offset().local_minus_utc(), 9 * 3600);
/// ```
pub fn parse_time(format: &str, input: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    match DateTime::parse_from_str(input, format) {
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {}
        result => return result,
    }

    match NaiveDateTime::parse_from_str(input, format) {
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {}
        result => return result.map(|t| t.and_utc().fixed_offset()),
    }

    let not_enough = match NaiveDate::parse_from_str(input, format) {
        Err(err) if err.kind() == ParseErrorKind::NotEnough => err,
        result => return result.map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
    };

    let time = NaiveTime::parse_from_str(input, format)?;
    let date = NaiveDate::from_ymd_opt(0, 1, 1).ok_or(not_enough)?;
    Ok(date.and_time(time).and_utc().fixed_offset())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use chrono::{Datelike, TimeZone, Timelike, Utc};

    use super::*;

    #[test]
    fn with_offset() {
        let t = parse_time("%Y-%m-%d %H:%M:%S %z", "2023-06-01 08:30:00 +0200").unwrap();

        assert_eq!(t.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(t, Utc.with_ymd_and_hms(2023, 6, 1, 6, 30, 0).unwrap());
    }

    #[test]
    fn rfc3339_layout() {
        let t = parse_time("%Y-%m-%dT%H:%M:%S%:z", "2006-01-02T15:04:05-07:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn without_offset_is_utc() {
        let t = parse_time("%Y-%m-%d %H:%M:%S", "2023-06-01 08:30:00").unwrap();

        assert_eq!(t.offset().local_minus_utc(), 0);
        assert_eq!(t, Utc.with_ymd_and_hms(2023, 6, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn date_only_is_midnight() {
        let t = parse_time("%Y-%m-%d", "2023-06-01").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn time_only_is_year_zero() {
        let t = parse_time("%H:%M", "07:15").unwrap();

        assert_eq!((t.year(), t.month(), t.day()), (0, 1, 1));
        assert_eq!((t.hour(), t.minute(), t.second()), (7, 15, 0));
    }

    #[test]
    fn mismatched_input() {
        let err = parse_time("%Y-%m-%d", "yesterday").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::Invalid);

        let err = parse_time("%Y-%m-%d", "2023-13-01").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::OutOfRange);

        let err = parse_time("%Y-%m-%d", "2023-06-01 extra").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::TooLong);
    }

    #[test]
    fn incomplete_format() {
        // Neither a date nor a time of day
        let err = parse_time("%Y", "2023").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::NotEnough);
    }
}
