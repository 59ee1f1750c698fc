//! Timestamp parsing for dates supplied in requests.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use salvo::{oapi::extract::QueryParam, prelude::StatusError};
use tracing::warn;

/// Which end of the day a bare `YYYY-MM-DD` date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayBound {
    Start,
    End,
}

/// Parse an RFC 3339 timestamp or a bare UTC calendar date.
pub(crate) fn parse_timestamp(
    value: &str,
    field: &str,
    bound: DayBound,
) -> Result<Timestamp, StatusError> {
    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    let parsed = value.parse::<Date>().and_then(|date| {
        let datetime = match bound {
            DayBound::Start => date.to_datetime(jiff::civil::Time::midnight()),
            DayBound::End => date.at(23, 59, 59, 999_999_999),
        };

        datetime.to_zoned(TimeZone::UTC).map(|zoned| zoned.timestamp())
    });

    parsed.map_err(|error| {
        warn!(field, value, "rejecting unparseable timestamp: {error}");

        StatusError::bad_request().brief(format!("could not parse \"{field}\""))
    })
}

pub(crate) trait EvaluationTimeExt {
    /// The `at` query parameter, or now when absent.
    fn at_or_now(self) -> Result<Timestamp, StatusError>;
}

impl EvaluationTimeExt for QueryParam<String, false> {
    fn at_or_now(self) -> Result<Timestamp, StatusError> {
        match self.into_inner() {
            Some(value) => parse_timestamp(&value, "at", DayBound::Start),
            None => Ok(Timestamp::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rfc3339_is_taken_verbatim() -> TestResult {
        let parsed = parse_timestamp("2026-02-01T08:30:00+02:00", "startDate", DayBound::End)?;

        assert_eq!(parsed, "2026-02-01T06:30:00Z".parse()?);

        Ok(())
    }

    #[test]
    fn bare_dates_cover_the_whole_utc_day() -> TestResult {
        let start = parse_timestamp("2026-03-31", "startDate", DayBound::Start)?;
        let end = parse_timestamp("2026-03-31", "endDate", DayBound::End)?;

        assert_eq!(start, "2026-03-31T00:00:00Z".parse()?);
        assert_eq!(end, "2026-03-31T23:59:59.999999999Z".parse()?);

        Ok(())
    }

    #[test]
    fn garbage_is_a_bad_request_naming_the_field() {
        let error = parse_timestamp("next tuesday", "endDate", DayBound::End).err();

        assert_eq!(
            error.as_ref().map(|e| e.code),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            error.map(|e| e.brief),
            Some("could not parse \"endDate\"".to_string())
        );
    }
}
