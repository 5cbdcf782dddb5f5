use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Builds an absolute timestamp from broken-down date components. Dates are
/// interpreted as UTC. Returns `None` if any component is out of range.
pub fn datetime_from_parts(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> Option<OffsetDateTime> {
    let month = Month::try_from(month).ok()?;
    let date = Date::from_calendar_date(year, month, day).ok()?;
    let time = Time::from_hms(hour, minute, second).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_utc())
}

/// Formats a timestamp in the locale-independent `ctime` style, including
/// the trailing newline (e.g. `Thu Jan  1 00:00:00 1970\n`).
pub fn format_ctime(dt: OffsetDateTime) -> String {
    format!(
        "{} {} {:2} {:02}:{:02}:{:02} {}\n",
        WEEKDAYS[dt.weekday().number_days_from_sunday() as usize],
        MONTHS[u8::from(dt.month()) as usize - 1],
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.year()
    )
}

/// Formats a timestamp as a filename-safe stamp (e.g. `1998-12-31-23-59-59`).
pub fn format_stamp(dt: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}-{:02}-{:02}-{:02}",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_from_parts() {
        let dt = datetime_from_parts(1998, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(dt.unix_timestamp(), 915148799);
        assert!(datetime_from_parts(1998, 13, 1, 0, 0, 0).is_none());
        assert!(datetime_from_parts(1998, 2, 30, 0, 0, 0).is_none());
        assert!(datetime_from_parts(1998, 1, 1, 24, 0, 0).is_none());
    }

    #[test]
    fn test_format_ctime() {
        let epoch = OffsetDateTime::from_unix_timestamp(0).unwrap();
        assert_eq!(format_ctime(epoch), "Thu Jan  1 00:00:00 1970\n");
        let dt = datetime_from_parts(2004, 10, 17, 9, 5, 30).unwrap();
        assert_eq!(format_ctime(dt), "Sun Oct 17 09:05:30 2004\n");
    }

    #[test]
    fn test_format_stamp() {
        let dt = datetime_from_parts(1998, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_stamp(dt), "1998-01-02-03-04-05");
    }
}
