//! "Mon D" posting labels as they appear in the README's Date Posted column.
//!
//! The README never carries a year, so turning a label back into a date needs a
//! [`YearPolicy`].

use chrono::{Datelike, NaiveDate, ParseResult};

/// How a year is chosen for a label such as `"Dec 15"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YearPolicy {
    /// Always use this year.
    Fixed(i32),
    /// Use the reference date's year, or the year before when the label would
    /// otherwise land after the reference date.
    RelativeTo(NaiveDate),
}

impl YearPolicy {
    pub fn resolve(&self, label: &str) -> ParseResult<NaiveDate> {
        match *self {
            YearPolicy::Fixed(year) => parse_in_year(label, year),
            YearPolicy::RelativeTo(reference) => {
                // Leap years can be up to eight apart (1896, 1904).
                for year in (reference.year() - 8..=reference.year()).rev() {
                    match parse_in_year(label, year) {
                        Ok(date) if date <= reference => return Ok(date),
                        _ => continue,
                    }
                }
                // Only errors can remain here: a valid date a year back is always earlier.
                parse_in_year(label, reference.year() - 1)
            }
        }
    }
}

fn parse_in_year(label: &str, year: i32) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{} {}", label.trim(), year), "%b %d %Y")
}

/// Labels that denote `date` in the README: zero-padded (`"Dec 05"`) and bare (`"Dec 5"`).
pub fn labels_for(date: NaiveDate) -> [String; 2] {
    [
        date.format("%b %d").to_string(),
        date.format("%b %-d").to_string(),
    ]
}

/// True when `label` names the same month and day as `date`.
pub fn is_posted_on(label: &str, date: NaiveDate) -> bool {
    let label = label.trim();
    labels_for(date).iter().any(|candidate| candidate == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_labels_for_single_digit_day() {
        assert_eq!(labels_for(ymd(2024, 12, 5)), ["Dec 05".to_string(), "Dec 5".to_string()]);
        assert_eq!(labels_for(ymd(2024, 12, 15)), ["Dec 15".to_string(), "Dec 15".to_string()]);
    }

    #[test]
    fn test_is_posted_on() {
        let day = ymd(2024, 12, 15);
        assert!(is_posted_on("Dec 15", day));
        assert!(is_posted_on(" Dec 15 ", day));
        assert!(!is_posted_on("Dec 16", day));
        assert!(!is_posted_on("", day));
        assert!(is_posted_on("Jan 3", ymd(2025, 1, 3)));
        assert!(is_posted_on("Jan 03", ymd(2025, 1, 3)));
    }

    #[test]
    fn test_fixed_year() {
        let policy = YearPolicy::Fixed(2023);
        assert_eq!(policy.resolve("Dec 15").unwrap(), ymd(2023, 12, 15));
        assert_eq!(policy.resolve("Jan 3").unwrap(), ymd(2023, 1, 3));
    }

    #[test]
    fn test_relative_year_stays_in_reference_year() {
        let policy = YearPolicy::RelativeTo(ymd(2024, 12, 15));
        assert_eq!(policy.resolve("Dec 15").unwrap(), ymd(2024, 12, 15));
        assert_eq!(policy.resolve("Jun 01").unwrap(), ymd(2024, 6, 1));
    }

    #[test]
    fn test_relative_year_steps_back_for_future_labels() {
        let policy = YearPolicy::RelativeTo(ymd(2025, 1, 2));
        assert_eq!(policy.resolve("Dec 30").unwrap(), ymd(2024, 12, 30));
        assert_eq!(policy.resolve("Jan 2").unwrap(), ymd(2025, 1, 2));
    }

    #[test]
    fn test_relative_year_handles_leap_day() {
        // 2025 has no Feb 29, 2024 does.
        let policy = YearPolicy::RelativeTo(ymd(2025, 3, 1));
        assert_eq!(policy.resolve("Feb 29").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_relative_year_leap_day_before_reference_in_leap_year() {
        // 2024-02-29 is after the reference and 2021-2023 have no Feb 29.
        let reference = ymd(2024, 2, 1);
        let resolved = YearPolicy::RelativeTo(reference).resolve("Feb 29").unwrap();
        assert_eq!(resolved, ymd(2020, 2, 29));
        assert!(resolved <= reference);

        // 1900 is not a leap year.
        let policy = YearPolicy::RelativeTo(ymd(1904, 1, 10));
        assert_eq!(policy.resolve("Feb 29").unwrap(), ymd(1896, 2, 29));
    }

    #[test]
    fn test_relative_year_never_after_reference() {
        let reference = ymd(2024, 2, 28);
        for label in ["Jan 1", "Feb 28", "Feb 29", "Mar 1", "Dec 31"] {
            let resolved = YearPolicy::RelativeTo(reference).resolve(label).unwrap();
            assert!(resolved <= reference, "{} resolved to {}", label, resolved);
        }
    }

    #[test]
    fn test_unparseable_labels() {
        let policy = YearPolicy::RelativeTo(ymd(2024, 12, 15));
        assert!(policy.resolve("").is_err());
        assert!(policy.resolve("yesterday").is_err());
        assert!(policy.resolve("Dec 32").is_err());
        assert!(YearPolicy::Fixed(2023).resolve("Feb 29").is_err());
    }
}
