//! Duration specs for trailing windows.
//!
//! Accepts one or more `<number><unit>` terms, e.g. `"5m"`, `"1h30m"`,
//! `"1.5h"` or `"2 days"`.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use aggregate_spi::AggregateError;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// A parsed trailing-window duration, remembering how it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    raw: String,
    duration: Duration,
}

impl WindowSpec {
    /// Duration text exactly as configured; used in metric names.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for WindowSpec {
    type Err = AggregateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let fail = |reason: String| AggregateError::InvalidWindowSpec {
            spec: raw.to_string(),
            reason,
        };

        let text = raw.trim();
        if text.is_empty() {
            return Err(fail("empty duration".to_string()));
        }

        let mut total_nanos: f64 = 0.0;
        let mut rest = text;
        while !rest.is_empty() {
            let number_len = rest
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .unwrap_or(rest.len());
            if number_len == 0 {
                return Err(fail(format!("expected a number at '{rest}'")));
            }
            let number: f64 = rest[..number_len]
                .parse()
                .map_err(|_| fail(format!("invalid number '{}'", &rest[..number_len])))?;
            rest = rest[number_len..].trim_start();

            let unit_len = rest
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            if unit_len == 0 {
                return Err(fail("missing unit".to_string()));
            }
            let unit = &rest[..unit_len];
            let seconds_per_unit =
                unit_seconds(unit).ok_or_else(|| fail(format!("unknown unit '{unit}'")))?;
            total_nanos += number * seconds_per_unit * NANOS_PER_SECOND;
            rest = rest[unit_len..].trim_start();
        }

        if !total_nanos.is_finite() || total_nanos > i64::MAX as f64 {
            return Err(fail("duration out of range".to_string()));
        }

        Ok(Self {
            raw: text.to_string(),
            duration: Duration::nanoseconds(total_nanos.round() as i64),
        })
    }
}

fn unit_seconds(unit: &str) -> Option<f64> {
    let seconds = match unit.to_ascii_lowercase().as_str() {
        "w" | "week" | "weeks" => 7.0 * 86_400.0,
        "d" | "day" | "days" => 86_400.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600.0,
        "m" | "t" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "ms" | "l" | "milli" | "millis" | "millisecond" | "milliseconds" => 1e-3,
        "us" | "u" | "micro" | "micros" | "microsecond" | "microseconds" => 1e-6,
        "ns" | "n" | "nano" | "nanos" | "nanosecond" | "nanoseconds" => 1e-9,
        _ => return None,
    };
    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(spec: &str) -> Duration {
        spec.parse::<WindowSpec>().unwrap().duration()
    }

    #[test]
    fn test_simple_units() {
        assert_eq!(parse("5m"), Duration::minutes(5));
        assert_eq!(parse("1h"), Duration::hours(1));
        assert_eq!(parse("30s"), Duration::seconds(30));
        assert_eq!(parse("2d"), Duration::days(2));
        assert_eq!(parse("1w"), Duration::weeks(1));
        assert_eq!(parse("250ms"), Duration::milliseconds(250));
        assert_eq!(parse("15min"), Duration::minutes(15));
        assert_eq!(parse("10T"), Duration::minutes(10));
    }

    #[test]
    fn test_compound_and_fractional() {
        assert_eq!(parse("1h30m"), Duration::minutes(90));
        assert_eq!(parse("1.5h"), Duration::minutes(90));
        assert_eq!(parse("2 days"), Duration::days(2));
        assert_eq!(parse(" 1h 15m "), Duration::minutes(75));
    }

    #[test]
    fn test_zero_is_allowed() {
        assert_eq!(parse("0s"), Duration::zero());
    }

    #[test]
    fn test_keeps_raw_text() {
        let spec: WindowSpec = "5m".parse().unwrap();
        assert_eq!(spec.as_str(), "5m");
        assert_eq!(spec.to_string(), "5m");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let spec: WindowSpec = " 1h 15m ".parse().unwrap();
        assert_eq!(spec.as_str(), "1h 15m");
        assert_eq!(spec.duration(), Duration::minutes(75));
    }

    #[test]
    fn test_rejects_bad_specs() {
        for bad in ["", "   ", "5", "m5", "5x", "-5m", "1..5h", "five minutes"] {
            let err = bad.parse::<WindowSpec>().unwrap_err();
            assert!(
                matches!(&err, AggregateError::InvalidWindowSpec { spec, .. } if spec == bad),
                "expected InvalidWindowSpec for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_overflow() {
        assert!("99999999999999999999w".parse::<WindowSpec>().is_err());
    }
}
