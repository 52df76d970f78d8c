// src/parse/period.rs

//! Event period parsing.
//!
//! Periods arrive as free text such as `"09.01(월) ~ 09.30(화)"`. Only the
//! `M.D ~ M.D` shape is understood; the year is a configured constant, so
//! events spanning a year boundary come out with both dates in the same year.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::FieldError;

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// Parsed start/end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Both dates as `YYYY-MM-DD`.
    pub fn to_iso(&self) -> (String, String) {
        (
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Parses `M.D ~ M.D` period text against a fixed reference year.
#[derive(Debug, Clone, Copy)]
pub struct PeriodParser {
    reference_year: i32,
}

impl PeriodParser {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Parse period text into start and end dates.
    pub fn parse(&self, text: &str) -> Result<Period, FieldError> {
        let flat = text.replace(['\n', '\r'], "");
        let without_notes = PARENTHESIZED.replace_all(&flat, "");
        let compact: String = without_notes.chars().filter(|c| !c.is_whitespace()).collect();

        if compact.is_empty() {
            return Err(FieldError::missing("period"));
        }

        let parts: Vec<&str> = compact.split('~').collect();
        match parts.as_slice() {
            [start, end] if !start.is_empty() && !end.is_empty() => Ok(Period {
                start: self.month_day(start)?,
                end: self.month_day(end)?,
            }),
            _ => Err(FieldError::malformed("period", text)),
        }
    }

    /// Parse period text, degrading to `("", "")` on any failure.
    pub fn parse_or_empty(&self, text: &str) -> (String, String) {
        match self.parse(text) {
            Ok(period) => period.to_iso(),
            Err(e) => {
                log::debug!("Unparseable period: {e}");
                (String::new(), String::new())
            }
        }
    }

    fn month_day(&self, s: &str) -> Result<NaiveDate, FieldError> {
        let (month, day) = s
            .split_once('.')
            .ok_or_else(|| FieldError::malformed("period", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| FieldError::malformed("period month", month))?;
        let day: u32 = day
            .parse()
            .map_err(|_| FieldError::malformed("period day", day))?;
        NaiveDate::from_ymd_opt(self.reference_year, month, day)
            .ok_or_else(|| FieldError::malformed("period", s))
    }
}

/// Convert a `YYYYMMDDHHMMSS` timestamp into the listing's `M.D` form.
///
/// Returns an empty string when the timestamp is too short or not numeric.
pub fn md_from_timestamp(stamp: &str) -> String {
    let s = stamp.trim();
    let field = |range: std::ops::Range<usize>| s.get(range).and_then(|v| v.parse::<u32>().ok());

    match (field(0..4), field(4..6), field(6..8)) {
        (Some(_), Some(month), Some(day)) => format!("{month}.{day}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PeriodParser {
        PeriodParser::new(2025)
    }

    #[test]
    fn test_parses_annotated_range() {
        assert_eq!(
            parser().parse_or_empty("09.01(월) ~ 09.30(화)"),
            ("2025-09-01".to_string(), "2025-09-30".to_string())
        );
    }

    #[test]
    fn test_parses_compact_range() {
        assert_eq!(
            parser().parse_or_empty("09.01(수)~09.07(화)"),
            ("2025-09-01".to_string(), "2025-09-07".to_string())
        );
    }

    #[test]
    fn test_pads_single_digits_and_ignores_newlines() {
        assert_eq!(
            parser().parse_or_empty("9.1\n ~ \r\n9.7 (오후 8시까지)"),
            ("2025-09-01".to_string(), "2025-09-07".to_string())
        );
    }

    #[test]
    fn test_uses_reference_year() {
        let (start, end) = PeriodParser::new(2026).parse_or_empty("12.20 ~ 01.05");
        // Year boundaries are not detected
        assert_eq!(start, "2026-12-20");
        assert_eq!(end, "2026-01-05");
    }

    #[test]
    fn test_malformed_shapes_degrade_to_empty() {
        let empty = (String::new(), String::new());
        for text in [
            "",
            "상시 진행",
            "09.01",
            "09.01 ~",
            "~ 09.30",
            "09.01 ~ 09.15 ~ 09.30",
            "09.01 ~ 상시",
            "13.01 ~ 13.05",
            "02.30 ~ 03.01",
            "9.1.2 ~ 9.3",
        ] {
            assert_eq!(parser().parse_or_empty(text), empty, "input: {text:?}");
        }
    }

    #[test]
    fn test_error_reasons_are_named() {
        assert_eq!(parser().parse(""), Err(FieldError::missing("period")));
        assert!(matches!(
            parser().parse("09.01"),
            Err(FieldError::Malformed { field: "period", .. })
        ));
    }

    #[test]
    fn test_well_formed_inputs_always_produce_iso_dates() {
        for month in 1..=12u32 {
            for day in [1u32, 9, 10, 28] {
                let text = format!("{month}.{day}(금) ~ {month:02}.{day:02}");
                let (start, end) = parser().parse_or_empty(&text);
                let expected = format!("2025-{month:02}-{day:02}");
                assert_eq!(start, expected);
                assert_eq!(end, expected);
            }
        }
    }

    #[test]
    fn test_md_from_timestamp() {
        assert_eq!(md_from_timestamp("20250901000000"), "9.1");
        assert_eq!(md_from_timestamp("20251231235959"), "12.31");
        assert_eq!(md_from_timestamp(""), "");
        assert_eq!(md_from_timestamp("2025"), "");
        assert_eq!(md_from_timestamp("2025ab01"), "");
    }
}
