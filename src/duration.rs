//! Human timeframe parsing
//!
//! Normalizes expressions such as `"5 minutes"` or `"1 year"` into a count of
//! milliseconds. Months and years use fixed approximations (30 and 365 days).

use crate::error::DurationError;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

/// Units accepted in a timeframe expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Look up a unit by its singular or plural name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let unit = match name.to_ascii_lowercase().as_str() {
            "second" | "seconds" => Self::Second,
            "minute" | "minutes" => Self::Minute,
            "hour" | "hours" => Self::Hour,
            "day" | "days" => Self::Day,
            "week" | "weeks" => Self::Week,
            "month" | "months" => Self::Month,
            "year" | "years" => Self::Year,
            _ => return None,
        };
        Some(unit)
    }

    /// Length of one unit in milliseconds
    pub fn millis(self) -> i64 {
        match self {
            Self::Second => SECOND_MS,
            Self::Minute => MINUTE_MS,
            Self::Hour => HOUR_MS,
            Self::Day => DAY_MS,
            Self::Week => WEEK_MS,
            Self::Month => MONTH_MS,
            Self::Year => YEAR_MS,
        }
    }
}

/// Parse `"<number> <timeunit>"` into milliseconds.
///
/// A missing or blank expression means "no timeframe" and yields `0`.
///
/// # Test Reference
/// - Test: `duration::tests::test_parse_known_units`
/// - Test: `duration::tests::test_parse_rejects_malformed`
pub fn parse_duration_ms(input: Option<&str>) -> Result<i64, DurationError> {
    let Some(input) = input.filter(|s| !s.trim().is_empty()) else {
        return Ok(0);
    };

    let parts: Vec<&str> = input.split_whitespace().collect();
    let [count, unit] = parts.as_slice() else {
        return Err(DurationError::InvalidFormat);
    };

    let value: i64 = count
        .parse()
        .map_err(|_| DurationError::InvalidNumber(count.to_string()))?;

    let unit_name = unit.to_ascii_lowercase();
    let unit = TimeUnit::from_name(&unit_name)
        .ok_or_else(|| DurationError::UnknownUnit(unit_name.clone()))?;

    if value < 0 {
        return Err(DurationError::Negative(value));
    }

    value
        .checked_mul(unit.millis())
        .ok_or(DurationError::Overflow {
            count: value,
            unit: unit_name,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_units() {
        assert_eq!(parse_duration_ms(Some("1 second")), Ok(1_000));
        assert_eq!(parse_duration_ms(Some("5 minutes")), Ok(300_000));
        assert_eq!(parse_duration_ms(Some("3 hours")), Ok(10_800_000));
        assert_eq!(parse_duration_ms(Some("2 days")), Ok(172_800_000));
        assert_eq!(parse_duration_ms(Some("1 week")), Ok(604_800_000));
        assert_eq!(parse_duration_ms(Some("1 month")), Ok(2_592_000_000));
        assert_eq!(parse_duration_ms(Some("1 year")), Ok(31_536_000_000));
    }

    #[test]
    fn test_parse_blank_is_zero() {
        assert_eq!(parse_duration_ms(None), Ok(0));
        assert_eq!(parse_duration_ms(Some("")), Ok(0));
        assert_eq!(parse_duration_ms(Some("   ")), Ok(0));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            parse_duration_ms(Some("5 MINUTES")),
            parse_duration_ms(Some("5 minutes"))
        );
        assert_eq!(parse_duration_ms(Some("2 Days")), Ok(172_800_000));
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        assert_eq!(parse_duration_ms(Some("  10 \t seconds ")), Ok(10_000));
    }

    #[test]
    fn test_parse_zero_count() {
        assert_eq!(parse_duration_ms(Some("0 days")), Ok(0));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            parse_duration_ms(Some("5 fortnights")),
            Err(DurationError::UnknownUnit("fortnights".to_string()))
        );
        assert_eq!(
            parse_duration_ms(Some("five minutes")),
            Err(DurationError::InvalidNumber("five".to_string()))
        );
        assert_eq!(parse_duration_ms(Some("5")), Err(DurationError::InvalidFormat));
        assert_eq!(
            parse_duration_ms(Some("5 minutes ago")),
            Err(DurationError::InvalidFormat)
        );
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(
            parse_duration_ms(Some("-3 days")),
            Err(DurationError::Negative(-3))
        );
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let result = parse_duration_ms(Some("9223372036854775807 years"));
        assert!(matches!(result, Err(DurationError::Overflow { .. })));
    }

    #[test]
    fn test_unit_lookup() {
        assert_eq!(TimeUnit::from_name("Weeks"), Some(TimeUnit::Week));
        assert_eq!(TimeUnit::from_name("fortnight"), None);
        assert_eq!(TimeUnit::Month.millis(), 30 * TimeUnit::Day.millis());
    }
}
