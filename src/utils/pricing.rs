use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use serde::Serialize;

use crate::utils::distance::parse_distance;

/// Base fee covering the first two delivery miles
pub const BASE_FEE: f64 = 5.99;
pub const BASE_MILES: f64 = 2.0;
/// Each mile beyond the base distance
pub const PER_EXTRA_MILE: f64 = 1.89;
/// Flat weekday rush-hour surcharge
pub const RUSH_SURCHARGE: f64 = 1.65;
/// Fixed service fee, independent of distance and time
pub const SERVICE_FEE: f64 = 1.19;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2})\s*([AaPp][Mm])").expect("invalid time regex")
});

/// Parse a "h:mm AM/PM" string into minutes since midnight. For a range
/// ("10:00 AM - 11:00 AM") the start time is used.
fn time_to_minutes(time: &str) -> Option<u32> {
    let caps = TIME_RE.captures(time)?;

    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    if hour == 0 || hour > 12 || minute > 59 {
        return None;
    }

    let is_pm = caps.get(3)?.as_str().eq_ignore_ascii_case("pm");
    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    Some(hour24 * 60 + minute)
}

/// Convert a "h:mm AM/PM" selection to 24-hour "HH:MM" for order records.
pub fn to_24h(time: &str) -> Option<String> {
    let minutes = time_to_minutes(time)?;
    Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Rush hour is 11:00-13:00 and 16:00-18:00 (endpoints inclusive),
/// Monday through Friday only. Any parse failure fails open to false.
pub fn is_rush_hour(time: &str, date: NaiveDate) -> bool {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => return false,
        _ => {}
    }

    let Some(minutes) = time_to_minutes(time) else {
        return false;
    };

    (660..=780).contains(&minutes) || (960..=1080).contains(&minutes)
}

/// Round half-up to cents
pub fn round_cents(fee: f64) -> f64 {
    (fee * 100.0).round() / 100.0
}

/// Compute the delivery fee for a distance string, an optional selected
/// time/date, and the partner flag. Partner pharmacies are subsidized.
pub fn calculate_delivery_fee(
    distance: &str,
    time: Option<&str>,
    date: Option<NaiveDate>,
    is_partner_pharmacy: bool,
) -> f64 {
    if is_partner_pharmacy {
        return 0.0;
    }

    let miles = parse_distance(distance);
    let mut fee = BASE_FEE + (miles - BASE_MILES).max(0.0) * PER_EXTRA_MILE;

    if let (Some(time), Some(date)) = (time, date) {
        if is_rush_hour(time, date) {
            fee += RUSH_SURCHARGE;
        }
    }

    round_cents(fee)
}

#[derive(Debug, Serialize)]
pub struct FeeQuote {
    pub delivery_fee: f64,
    pub service_fee: f64,
    pub total: f64,
    /// The non-partner fee, kept for struck-through display when the
    /// selected pharmacy is a partner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_fee: Option<f64>,
    pub rush_hour: bool,
}

/// Full price breakdown for a prospective order
pub fn quote(
    distance: &str,
    time: Option<&str>,
    date: Option<NaiveDate>,
    is_partner_pharmacy: bool,
) -> FeeQuote {
    let delivery_fee = calculate_delivery_fee(distance, time, date, is_partner_pharmacy);
    let rush_hour = match (time, date) {
        (Some(t), Some(d)) => is_rush_hour(t, d),
        _ => false,
    };

    FeeQuote {
        delivery_fee,
        service_fee: SERVICE_FEE,
        total: round_cents(delivery_fee + SERVICE_FEE),
        original_fee: is_partner_pharmacy
            .then(|| calculate_delivery_fee(distance, time, date, false)),
        rush_hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        // 2025-03-03 is a Monday
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_base_fee_within_two_miles() {
        assert_eq!(calculate_delivery_fee("2 mi", None, None, false), 5.99);
        assert_eq!(calculate_delivery_fee("0.5 mi", None, None, false), 5.99);
        assert_eq!(calculate_delivery_fee("295 ft", None, None, false), 5.99);
    }

    #[test]
    fn test_linear_fee_beyond_two_miles() {
        // 5.99 + 3 * 1.89
        assert_eq!(calculate_delivery_fee("5 mi", None, None, false), 11.66);
    }

    #[test]
    fn test_partner_is_always_free() {
        assert_eq!(calculate_delivery_fee("5 mi", None, None, true), 0.0);
        assert_eq!(
            calculate_delivery_fee("25 mi", Some("12:00 PM"), Some(monday()), true),
            0.0
        );
    }

    #[test]
    fn test_rush_surcharge_applied_on_weekday() {
        let fee = calculate_delivery_fee("2 mi", Some("12:00 PM"), Some(monday()), false);
        assert_eq!(fee, 5.99 + 1.65);
    }

    #[test]
    fn test_no_surcharge_on_weekend() {
        let fee = calculate_delivery_fee("2 mi", Some("12:00 PM"), Some(saturday()), false);
        assert_eq!(fee, 5.99);
    }

    #[test]
    fn test_rush_window_endpoints_inclusive() {
        assert!(is_rush_hour("11:00 AM", monday()));
        assert!(is_rush_hour("1:00 PM", monday()));
        assert!(is_rush_hour("4:00 PM", monday()));
        assert!(is_rush_hour("6:00 PM", monday()));
        assert!(!is_rush_hour("10:59 AM", monday()));
        assert!(!is_rush_hour("1:01 PM", monday()));
        assert!(!is_rush_hour("3:59 PM", monday()));
        assert!(!is_rush_hour("6:01 PM", monday()));
    }

    #[test]
    fn test_rush_hour_uses_range_start() {
        assert!(is_rush_hour("12:30 PM - 1:30 PM", monday()));
        assert!(!is_rush_hour("2:00 PM - 5:00 PM", monday()));
    }

    #[test]
    fn test_unparseable_time_fails_open() {
        assert!(!is_rush_hour("noonish", monday()));
        assert!(!is_rush_hour("", monday()));
        assert!(!is_rush_hour("25:00 PM", monday()));
    }

    #[test]
    fn test_quote_total_includes_service_fee() {
        let q = quote("5 mi", None, None, false);
        assert_eq!(q.delivery_fee, 11.66);
        assert_eq!(q.service_fee, 1.19);
        assert_eq!(q.total, 12.85);
        assert!(q.original_fee.is_none());
    }

    #[test]
    fn test_partner_quote_keeps_original_fee() {
        let q = quote("5 mi", None, None, true);
        assert_eq!(q.delivery_fee, 0.0);
        assert_eq!(q.total, 1.19);
        assert_eq!(q.original_fee, Some(11.66));
    }

    #[test]
    fn test_to_24h() {
        assert_eq!(to_24h("9:05 AM").as_deref(), Some("09:05"));
        assert_eq!(to_24h("12:00 AM").as_deref(), Some("00:00"));
        assert_eq!(to_24h("12:30 PM").as_deref(), Some("12:30"));
        assert_eq!(to_24h("6:45 PM").as_deref(), Some("18:45"));
        assert_eq!(to_24h("sometime"), None);
    }
}
