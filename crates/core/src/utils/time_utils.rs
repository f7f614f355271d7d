use chrono::{Datelike, NaiveDate, Weekday};

/// Monday through Friday. No holiday calendar is applied.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The first business day on or after `date`.
pub fn roll_forward_to_business_day(date: NaiveDate) -> NaiveDate {
    let mut current = date;
    while !is_business_day(current) {
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// `count` consecutive business days starting the calendar day after `last`.
///
/// If `last` is a Friday the first date is the following Monday.
pub fn business_days_after(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let Some(start) = last.succ_opt() else {
        return days;
    };

    let mut current = roll_forward_to_business_day(start);
    while days.len() < count {
        if is_business_day(current) {
            days.push(current);
        }
        match current.succ_opt() {
            Some(next) => current = next,
            // Should not happen for typical date ranges
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_business_day() {
        assert!(is_business_day(date(2024, 1, 5))); // Friday
        assert!(!is_business_day(date(2024, 1, 6))); // Saturday
        assert!(!is_business_day(date(2024, 1, 7))); // Sunday
        assert!(is_business_day(date(2024, 1, 8))); // Monday
    }

    #[test]
    fn test_roll_forward() {
        assert_eq!(roll_forward_to_business_day(date(2024, 1, 6)), date(2024, 1, 8));
        assert_eq!(roll_forward_to_business_day(date(2024, 1, 3)), date(2024, 1, 3));
    }

    #[test]
    fn test_business_days_after_friday_skips_weekend() {
        let days = business_days_after(date(2024, 1, 5), 5);
        assert_eq!(
            days,
            vec![
                date(2024, 1, 8),
                date(2024, 1, 9),
                date(2024, 1, 10),
                date(2024, 1, 11),
                date(2024, 1, 12),
            ]
        );
        // Saturday the 6th through Friday the 12th.
        let span = (days[4] - date(2024, 1, 6)).num_days() + 1;
        assert_eq!(span, 7);
    }

    #[test]
    fn test_business_days_after_midweek() {
        let days = business_days_after(date(2024, 1, 3), 4);
        assert_eq!(
            days,
            vec![
                date(2024, 1, 4),
                date(2024, 1, 5),
                date(2024, 1, 8),
                date(2024, 1, 9),
            ]
        );
    }

    #[test]
    fn test_business_days_after_weekend_anchor() {
        assert_eq!(business_days_after(date(2024, 1, 6), 1), vec![date(2024, 1, 8)]);
        assert_eq!(business_days_after(date(2024, 1, 7), 1), vec![date(2024, 1, 8)]);
    }

    #[test]
    fn test_zero_count() {
        assert!(business_days_after(date(2024, 1, 5), 0).is_empty());
    }
}
