use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse an optional `--date` argument, defaulting to today.
pub fn parse_optional_date(s: Option<&String>) -> Option<NaiveDate> {
    match s {
        Some(v) => parse_date(v),
        None => Some(today()),
    }
}

pub fn to_db_str(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_date(" 2025-09-01 "), NaiveDate::from_ymd_opt(2025, 9, 1));
        assert_eq!(parse_date("01/09/2025"), None);
    }

    #[test]
    fn missing_optional_date_means_today() {
        assert_eq!(parse_optional_date(None), Some(today()));
        assert_eq!(parse_optional_date(Some(&"nope".to_string())), None);
    }
}
