//! Business-day arithmetic for pickup dates.
//!
//! A business day is Monday through Friday. Holidays are not considered.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Weekday};

/// Business days between order creation and pickup when not configured.
pub const DEFAULT_BUSINESS_DAYS: u32 = 3;

/// Display format for pickup dates (es-CL: day-month-year).
pub const PICKUP_DATE_FORMAT: &str = "%d-%m-%Y";

/// Whether `date` falls on a weekday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Return the date `business_days` business days after `start`.
///
/// Walks forward one calendar day at a time and counts only weekdays, so a
/// start on Friday with three business days lands on Wednesday. Zero business
/// days returns `start` unchanged, even when it is a weekend. Dates past the
/// end of the calendar saturate at the last representable day.
pub fn add_business_days(start: NaiveDate, business_days: u32) -> NaiveDate {
    if business_days == 0 {
        return start;
    }

    let mut date = start;
    let mut counted = 0;
    while counted < business_days {
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if is_business_day(date) {
            counted += 1;
        }
    }
    date
}

/// Apply [`add_business_days`] to a timestamp, keeping its time of day and zone.
///
/// Weekdays are judged in the timestamp's own zone. Returns `None` if the
/// shifted timestamp cannot be represented.
pub fn pickup_ready_at<Tz: TimeZone>(
    start: &DateTime<Tz>,
    business_days: u32,
) -> Option<DateTime<Tz>> {
    let start_date = start.date_naive();
    let pickup_date = add_business_days(start_date, business_days);
    let offset_days = (pickup_date - start_date).num_days();

    start
        .clone()
        .checked_add_days(Days::new(u64::try_from(offset_days).ok()?))
}

/// Format a pickup date for the customer-facing note, e.g. `12-06-2024`.
pub fn format_pickup_date(date: NaiveDate) -> String {
    date.format(PICKUP_DATE_FORMAT).to_string()
}
