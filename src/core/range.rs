use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::MatchError;

/// Inclusive `matchedAt` window; a missing bound is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse optional `start`/`end` parameters
    ///
    /// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates. A plain end
    /// date covers that whole day. Returns `Ok(None)` when neither bound is
    /// given, and `InvalidRange` for unparseable input or `start > end`.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, MatchError> {
        let start = non_empty(start).map(|s| parse_bound(s, Bound::Start)).transpose()?;
        let end = non_empty(end).map(|s| parse_bound(s, Bound::End)).transpose()?;

        if start.is_none() && end.is_none() {
            return Ok(None);
        }

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(MatchError::InvalidRange(format!(
                    "start {} is after end {}",
                    s.to_rfc3339(),
                    e.to_rfc3339()
                )));
            }
        }

        Ok(Some(Self { start, end }))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(raw: &str, bound: Bound) -> Result<DateTime<Utc>, MatchError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| MatchError::InvalidRange(format!("'{}' is not a date", raw)))?;

    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .ok_or_else(|| MatchError::InvalidRange(raw.to_string()))?,
    };

    Ok(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_no_bounds() {
        assert_eq!(DateRange::parse(None, None).unwrap(), None);
        assert_eq!(DateRange::parse(Some(""), Some(" ")).unwrap(), None);
    }

    #[test]
    fn test_plain_dates_cover_whole_days() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-01")).unwrap().unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_rfc3339_bounds() {
        let range = DateRange::parse(Some("2024-03-01T10:00:00Z"), Some("2024-03-01T12:00:00+02:00"))
            .unwrap()
            .unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 1).unwrap()));
    }

    #[test]
    fn test_open_ended() {
        let range = DateRange::parse(Some("2024-01-01"), None).unwrap().unwrap();
        assert!(range.end.is_none());
        assert!(range.contains(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            DateRange::parse(Some("yesterday"), None),
            Err(MatchError::InvalidRange(_))
        ));
        assert!(matches!(
            DateRange::parse(None, Some("2024-13-40")),
            Err(MatchError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_reversed_range_rejected() {
        assert!(matches!(
            DateRange::parse(Some("2024-05-02"), Some("2024-05-01")),
            Err(MatchError::InvalidRange(_))
        ));
    }
}
