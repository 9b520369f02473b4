use chrono::NaiveDate;

use crate::period::{format_day_month_year, parse_date_loose};

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, format_with_commas(cents / 100), cents % 100)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_date(date: NaiveDate) -> String {
    format_day_month_year(date)
}

pub fn format_date_str(raw: &str) -> String {
    parse_date_loose(raw)
        .map(format_date)
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_slash_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(2500.5), "$2,500.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-800.0), "-$800.00");
    }

    #[test]
    fn formats_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(format_date(date), "15 mar 2024");
        assert_eq!(format_slash_date(date), "15/03/2024");
        assert_eq!(format_date_str("2024-03-15T10:00:00Z"), "15 mar 2024");
        assert_eq!(format_date_str("pronto"), "pronto");
        assert_eq!(format_percent(93.756), "93.8%");
    }
}
