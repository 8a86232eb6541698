//! Weekly availability template — bookable start times per calendar date.
//!
//! Pure calculation over a fixed business-hours table; knows nothing about
//! existing bookings. `scheduling::open_slots` layers the booked-slot
//! filter on top.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

/// Fixed one-hour slot width.
const SLOT_HOURS: u32 = 1;

/// Opening and closing hours for a weekday, both bookable start times.
fn business_hours(weekday: Weekday) -> Option<(u32, u32)> {
    match weekday {
        Weekday::Sat => Some((9, 14)),
        Weekday::Sun => None,
        _ => Some((8, 17)),
    }
}

/// Bookable start times for the given date, in ascending order.
///
/// The closing hour is itself a bookable start time (closed interval), and
/// `None` yields no slots. Calling twice with the same date returns the
/// same sequence.
pub fn compute_slots(date: Option<NaiveDate>) -> Vec<NaiveTime> {
    let Some(date) = date else {
        return Vec::new();
    };

    let Some((opening, closing)) = business_hours(date.weekday()) else {
        return Vec::new();
    };

    (opening..=closing)
        .step_by(SLOT_HOURS as usize)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn weekdays_have_ten_slots() {
        // 2030-03-11 is a Monday; walk Mon..Fri
        for day in 11..=15 {
            let date = NaiveDate::from_ymd_opt(2030, 3, day).unwrap();
            let slots = compute_slots(Some(date));
            assert_eq!(slots.len(), 10, "day {day}");
            assert_eq!(slots.first(), Some(&hour(8)));
            assert_eq!(slots.last(), Some(&hour(17)));
        }
    }

    #[test]
    fn saturday_has_six_slots() {
        let saturday = NaiveDate::from_ymd_opt(2030, 3, 16).unwrap();
        let slots = compute_slots(Some(saturday));
        assert_eq!(
            slots,
            vec![hour(9), hour(10), hour(11), hour(12), hour(13), hour(14)]
        );
    }

    #[test]
    fn sunday_has_no_slots() {
        let sunday = NaiveDate::from_ymd_opt(2030, 3, 17).unwrap();
        assert!(compute_slots(Some(sunday)).is_empty());
    }

    #[test]
    fn missing_date_yields_empty() {
        assert!(compute_slots(None).is_empty());
    }

    #[test]
    fn repeat_calls_are_stable() {
        let date = NaiveDate::from_ymd_opt(2030, 3, 13).unwrap();
        assert_eq!(compute_slots(Some(date)), compute_slots(Some(date)));
    }
}
