// Copyright 2024 The ActiveMQ Manager Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use activemq_error::DecodeError;
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDateTime;
use chrono::TimeDelta;

/// Format the job scheduler expects for its query window bounds.
pub const JOB_WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const STAMP_PREFIX_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp as rendered by the broker console and job scheduler.
///
/// Accepted lengths are 19 (`2019-03-15 10:43:06`), 24 and 27 (the same prefix followed by
/// a millisecond and/or zone suffix). Milliseconds are read from positions 20..23 when they
/// are digits; any zone suffix is ignored and the result is a naive local time.
pub fn parse_activemq_timestamp(value: &str) -> Result<NaiveDateTime, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidTimestamp {
        value: value.to_string(),
        reason,
    };

    if !matches!(value.len(), 19 | 24 | 27) || !value.is_ascii() {
        return Err(invalid(format!(
            "activemq timestamps are 19, 24, or 27 characters: got {}",
            value.len()
        )));
    }

    let base = NaiveDateTime::parse_from_str(&value[..19], STAMP_PREFIX_FORMAT).map_err(|e| invalid(e.to_string()))?;

    let millis = value
        .get(20..23)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<i64>().ok())
        .unwrap_or(0);

    Ok(base + TimeDelta::milliseconds(millis))
}

/// Parse an RFC 3339 timestamp as serialized by Jolokia for `java.util.Date` values.
pub fn parse_rfc3339(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

pub fn format_job_window(time: &NaiveDateTime) -> String {
    time.format(JOB_WINDOW_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::Timelike;

    use super::*;

    #[test]
    fn parse_plain_stamp() {
        let ts = parse_activemq_timestamp("2019-03-15 10:43:06").unwrap();
        assert_eq!(ts.year(), 2019);
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.second(), 6);
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn parse_stamp_with_millis() {
        let ts = parse_activemq_timestamp("2019-03-15 10:43:06.123Z").unwrap();
        assert_eq!(ts.nanosecond(), 123_000_000);

        let ts = parse_activemq_timestamp("2019-03-15 10:43:06:123 UTC").unwrap();
        assert_eq!(ts.nanosecond(), 123_000_000);
    }

    #[test]
    fn parse_stamp_with_zone_only() {
        let ts = parse_activemq_timestamp("2019-03-15 10:43:06 EEST").unwrap();
        assert_eq!(ts.minute(), 43);
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn reject_unknown_lengths() {
        assert!(parse_activemq_timestamp("2019-03-15").is_err());
        assert!(parse_activemq_timestamp("2019-03-15 10:43:0").is_err());
        assert!(parse_activemq_timestamp("yyyy-03-15 10:43:06").is_err());
    }

    #[test]
    fn job_window_format() {
        let ts = parse_activemq_timestamp("2024-01-02 03:04:05").unwrap();
        assert_eq!(format_job_window(&ts), "2024-01-02 03:04:05");
    }

    #[test]
    fn rfc3339_dates() {
        assert!(parse_rfc3339("2024-01-02T03:04:05+00:00").is_some());
        assert!(parse_rfc3339("Tue Jan 02 03:04:05 UTC 2024").is_none());
    }
}
