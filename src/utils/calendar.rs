use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::types::Granularity;

/// Date-only formats accepted wherever a calendar date is parsed.
pub(crate) const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

/// First day of the `granularity` period that contains `date`.
///
/// Weeks start on the ISO Monday, so a week may begin in the previous year.
pub fn period_start(granularity: Granularity, date: NaiveDate) -> NaiveDate {
    let start = match granularity {
        Granularity::Year => date.with_ordinal(1),
        Granularity::Month => date.with_day(1),
        Granularity::Week => {
            date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        }
    };
    start.unwrap_or(date)
}

/// Parse a pre-bucketed period key into the start of its period.
///
/// Years may carry a thousands separator (`2,019`). Months accept `2019-04`,
/// `Apr 2019` or any full date inside the month. Weeks accept ISO keys like
/// `2019-W14` or any full date inside the week.
pub fn parse_period_key(granularity: Granularity, key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    let date = match granularity {
        Granularity::Year => {
            let year: i32 = key.replace(',', "").trim().parse().ok()?;
            NaiveDate::from_ymd_opt(year, 1, 1)
        }
        Granularity::Month => NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
            .ok()
            .or_else(|| NaiveDate::parse_from_str(&format!("1 {key}"), "%d %b %Y").ok())
            .or_else(|| NaiveDate::parse_from_str(&format!("1 {key}"), "%d %B %Y").ok())
            .or_else(|| parse_date(key)),
        Granularity::Week => parse_iso_week(key).or_else(|| parse_date(key)),
    }?;
    Some(period_start(granularity, date))
}

fn parse_iso_week(key: &str) -> Option<NaiveDate> {
    let (year, week) = key.split_once("-W")?;
    NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)
}

fn parse_date(key: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(key, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_start() {
        let date = ymd(2023, 6, 15); // Thursday
        assert_eq!(period_start(Granularity::Year, date), ymd(2023, 1, 1));
        assert_eq!(period_start(Granularity::Month, date), ymd(2023, 6, 1));
        assert_eq!(period_start(Granularity::Week, date), ymd(2023, 6, 12));
    }

    #[test]
    fn test_week_crossing_year_boundary() {
        // 2021-01-01 is a Friday in ISO week 2020-W53
        let start = period_start(Granularity::Week, ymd(2021, 1, 1));
        assert_eq!(start, ymd(2020, 12, 28));
        assert_eq!(start.format("%G-W%V").to_string(), "2020-W53");
    }

    #[test]
    fn test_parse_year_with_separator() {
        assert_eq!(parse_period_key(Granularity::Year, "2,019"), Some(ymd(2019, 1, 1)));
        assert_eq!(parse_period_key(Granularity::Year, "2019"), Some(ymd(2019, 1, 1)));
        assert_eq!(parse_period_key(Granularity::Year, "last year"), None);
    }

    #[test]
    fn test_parse_month_keys() {
        assert_eq!(parse_period_key(Granularity::Month, "2019-04"), Some(ymd(2019, 4, 1)));
        assert_eq!(parse_period_key(Granularity::Month, "Apr 2019"), Some(ymd(2019, 4, 1)));
        assert_eq!(parse_period_key(Granularity::Month, "April 2019"), Some(ymd(2019, 4, 1)));
        assert_eq!(parse_period_key(Granularity::Month, "2019-04-17"), Some(ymd(2019, 4, 1)));
    }

    #[test]
    fn test_parse_week_keys() {
        assert_eq!(parse_period_key(Granularity::Week, "2019-W14"), Some(ymd(2019, 4, 1)));
        assert_eq!(parse_period_key(Granularity::Week, "2019-04-03"), Some(ymd(2019, 4, 1)));
        assert_eq!(parse_period_key(Granularity::Week, "2019-W99"), None);
    }
}
