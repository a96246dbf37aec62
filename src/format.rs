// Display formatting (en-US only)

use chrono::NaiveDate;

const MILLION: f64 = 1_000_000.0;

/// Headline market cap: whole millions with an "M" suffix, e.g. "512M"
pub fn format_market_cap(value: f64) -> String {
    format!("{}M", (value / MILLION).round() as u64)
}

/// Featured entry value, e.g. "$5 Million USD"
pub fn format_entry_value(value: f64) -> String {
    format!("${} Million USD", (value / MILLION).round() as u64)
}

/// Long date, e.g. "October 18, 2026"
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(512_345_678.0), "512M");
        assert_eq!(format_market_cap(1_900_000.0), "2M");
        assert_eq!(format_market_cap(0.0), "0M");
        // Exact halves round up, like the entry value does
        assert_eq!(format_market_cap(2_500_000.0), "3M");
        assert_eq!(format_market_cap(3_500_000.0), "4M");
    }

    #[test]
    fn test_format_entry_value() {
        assert_eq!(format_entry_value(5_400_000.0), "$5 Million USD");
        assert_eq!(format_entry_value(5_600_000.0), "$6 Million USD");
        assert_eq!(format_entry_value(100.0), "$0 Million USD");
    }

    #[test]
    fn test_format_display_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(format_display_date(date), "October 18, 2026");

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_display_date(date), "March 5, 2024");
    }
}
