//! Approval date standardization.
//!
//! Registries record dates in many layouts. Each value is tried against an
//! ordered list of layouts and rendered as `MM/DD/YYYY`.

use chrono::{Datelike, NaiveDate};

/// Two-digit years at or above this are 19xx, below it 20xx.
pub const TWO_DIGIT_YEAR_PIVOT: u32 = 69;

#[derive(Debug, Clone, Copy)]
enum Year {
    TwoDigit,
    FourDigit,
}

/// Layouts in priority order. Two-digit variants are parsed by widening the
/// trailing year before handing the value to chrono.
const DATE_LAYOUTS: [(&str, Year); 10] = [
    ("%Y-%m-%d", Year::FourDigit),
    ("%d/%m/%Y", Year::TwoDigit),
    ("%d/%m/%Y", Year::FourDigit),
    ("%m/%d/%Y", Year::TwoDigit),
    ("%m/%d/%Y", Year::FourDigit),
    ("%d-%m-%Y", Year::FourDigit),
    ("%d.%m.%Y", Year::FourDigit),
    ("%Y/%m/%d", Year::FourDigit),
    ("%d-%b-%Y", Year::TwoDigit),
    ("%d-%b-%Y", Year::FourDigit),
];

/// Parse a registry date; `None` for blank or unrecognized values.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_LAYOUTS.iter().find_map(|&(layout, year)| match year {
        Year::TwoDigit => {
            let widened = widen_two_digit_year(value)?;
            NaiveDate::parse_from_str(&widened, layout).ok()
        }
        Year::FourDigit => NaiveDate::parse_from_str(value, layout)
            .ok()
            .filter(|date| date.year() >= 1000),
    })
}

/// Replace a trailing two-digit year with its four-digit form.
fn widen_two_digit_year(value: &str) -> Option<String> {
    let split = value.rfind(['/', '-'])?;
    let (head, year) = value.split_at(split + 1);
    if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let short: u32 = year.parse().ok()?;
    let century = if short >= TWO_DIGIT_YEAR_PIVOT { 1900 } else { 2000 };
    Some(format!("{head}{}", century + short))
}

/// Render as `MM/DD/YYYY`, or an empty string when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%m/%d/%Y").to_string())
        .unwrap_or_default()
}

/// [`parse_date`] then [`format_date`].
pub fn standardize_date(value: &str) -> String {
    format_date(parse_date(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_known_layouts() {
        let cases = [
            ("2017-09-05", "09/05/2017"),
            ("3/7/11", "07/03/2011"),
            ("03/07/2011", "07/03/2011"),
            ("12/31/20", "12/31/2020"),
            ("12/31/2020", "12/31/2020"),
            ("03-07-2011", "07/03/2011"),
            ("03.07.2011", "07/03/2011"),
            ("2021/06/15", "06/15/2021"),
            ("15-Jan-21", "01/15/2021"),
            ("15-Jan-2021", "01/15/2021"),
        ];
        for (raw, expected) in cases {
            assert_eq!(standardize_date(raw), expected, "input {raw}");
        }
    }

    #[test]
    fn two_digit_years_pivot_at_sixty_nine() {
        assert_eq!(standardize_date("1/1/70"), "01/01/1970");
        assert_eq!(standardize_date("1/1/69"), "01/01/1969");
        assert_eq!(standardize_date("15-Jan-69"), "01/15/1969");
        assert_eq!(standardize_date("1/1/68"), "01/01/2068");
        assert_eq!(standardize_date("1/1/00"), "01/01/2000");
    }

    #[test]
    fn blank_and_garbage_become_empty() {
        assert_eq!(standardize_date(""), "");
        assert_eq!(standardize_date("   "), "");
        assert_eq!(standardize_date("not a date"), "");
        assert_eq!(standardize_date("31/31/2020"), "");
    }
}
