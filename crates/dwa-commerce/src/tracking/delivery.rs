//! Delivery date and time-window estimation.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Window used whenever delivery is not today.
pub const DEFAULT_WINDOW: &str = "10:00 AM - 2:00 PM";

/// What the tracking screen shows under "delivery".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryEstimate {
    pub address: String,
    pub time: String,
    pub date: String,
}

/// Business rules for the estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryRules {
    /// Orders at or after this hour ship the next day.
    pub cutoff_hour: u32,
    /// Shown when no address was supplied.
    pub address_placeholder: String,
}

impl Default for DeliveryRules {
    fn default() -> Self {
        Self {
            cutoff_hour: 18,
            address_placeholder: "Delivery address not provided".to_string(),
        }
    }
}

impl DeliveryRules {
    /// Estimate delivery for an order placed at `now` (local time).
    pub fn estimate(&self, now: NaiveDateTime, address: Option<&str>) -> DeliveryEstimate {
        let hour = now.hour();
        let today = now.date();

        let mut target = today;
        if hour >= self.cutoff_hour {
            target = next_day(target);
        }
        if target.weekday() == Weekday::Sun {
            target = next_day(target);
        }

        let time = if target == today && hour < self.cutoff_hour {
            format!("{}:00 - {}:00", (hour + 2).min(17), (hour + 4).min(19))
        } else {
            DEFAULT_WINDOW.to_string()
        };

        let address = match address {
            Some(a) if !a.is_empty() => a.to_string(),
            _ => self.address_placeholder.clone(),
        };

        DeliveryEstimate {
            address,
            time,
            date: format_delivery_date(target),
        }
    }
}

/// [`DeliveryRules::estimate`] with the default rules.
pub fn estimate_delivery(now: NaiveDateTime, address: Option<&str>) -> DeliveryEstimate {
    DeliveryRules::default().estimate(now, address)
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_signed(Duration::days(1)).unwrap_or(date)
}

/// `17th Oct, 2026`.
pub fn format_delivery_date(date: NaiveDate) -> String {
    let day = date.day();
    format!("{}{} {}", day, ordinal_suffix(day), date.format("%b, %Y"))
}

/// English ordinal suffix for a day number.
pub fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (1, k) if k != 11 => "st",
        (2, k) if k != 12 => "nd",
        (3, k) if k != 13 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_ordinal_suffix() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (30, "th"),
            (31, "st"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal_suffix(n), expected, "day {}", n);
        }
    }

    #[test]
    fn test_morning_order_delivers_today() {
        // 2026-10-13 is a Tuesday.
        let est = estimate_delivery(at(2026, 10, 13, 10), Some("Osu, Accra"));
        assert_eq!(est.address, "Osu, Accra");
        assert_eq!(est.time, "12:00 - 14:00");
        assert_eq!(est.date, "13th Oct, 2026");
    }

    #[test]
    fn test_window_is_clamped() {
        let est = estimate_delivery(at(2026, 10, 13, 16), None);
        assert_eq!(est.time, "17:00 - 19:00");
        let est = estimate_delivery(at(2026, 10, 13, 17), None);
        assert_eq!(est.time, "17:00 - 19:00");
    }

    #[test]
    fn test_evening_order_delivers_tomorrow() {
        let est = estimate_delivery(at(2026, 10, 13, 18), None);
        assert_eq!(est.time, DEFAULT_WINDOW);
        assert_eq!(est.date, "14th Oct, 2026");
    }

    #[test]
    fn test_saturday_evening_skips_sunday() {
        // 2026-10-17 is a Saturday.
        let est = estimate_delivery(at(2026, 10, 17, 19), None);
        assert_eq!(est.date, "19th Oct, 2026");
        assert_eq!(est.time, DEFAULT_WINDOW);
    }

    #[test]
    fn test_sunday_morning_moves_to_monday() {
        let est = estimate_delivery(at(2026, 10, 18, 9), None);
        assert_eq!(est.date, "19th Oct, 2026");
        assert_eq!(est.time, DEFAULT_WINDOW);
    }

    #[test]
    fn test_year_rollover() {
        // 2026-12-31 is a Thursday.
        let est = estimate_delivery(at(2026, 12, 31, 20), None);
        assert_eq!(est.date, "1st Jan, 2027");
    }

    #[test]
    fn test_missing_address_uses_placeholder() {
        let est = estimate_delivery(at(2026, 10, 13, 10), Some(""));
        assert_eq!(est.address, "Delivery address not provided");
    }

    #[test]
    fn test_custom_cutoff() {
        let rules = DeliveryRules {
            cutoff_hour: 12,
            ..Default::default()
        };
        let est = rules.estimate(at(2026, 10, 13, 13), None);
        assert_eq!(est.date, "14th Oct, 2026");
        assert_eq!(est.time, DEFAULT_WINDOW);
    }
}
