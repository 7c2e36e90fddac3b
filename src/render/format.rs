use chrono::{DateTime, FixedOffset, Utc};
use num_format::{Locale, ToFormattedString};

/// `$12,345.67`: two decimals, thousands separators, rounded to the cent.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount.is_sign_negative() && cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

/// Viewer-local time of day, e.g. `3:07 PM`.
pub fn format_time_of_day(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_has_separators_and_cents() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(125.0), "$125.00");
        assert_eq!(format_currency(6655.5), "$6,655.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-42.5), "-$42.50");
        assert_eq!(format_currency(f64::NAN), "$0.00");
    }

    #[test]
    fn time_of_day_uses_offset() {
        let at = Utc.with_ymd_and_hms(2024, 5, 4, 15, 7, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let chicago = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_time_of_day(at, utc), "3:07 PM");
        assert_eq!(format_time_of_day(at, chicago), "10:07 AM");
    }
}
