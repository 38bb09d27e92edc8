use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// An inclusive calendar date range. A `None` end means the interval is
/// open-ended, e.g. an admission without a discharge date. Only the
/// constructors can build one, so `start <= end` holds for every bounded
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateInterval {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl DateInterval {
    /// Interval covering exactly one billable day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: Some(date),
        }
    }

    /// Interval covering a full calendar month, using the month's actual
    /// day count (leap Februaries included).
    pub fn calendar_month(year: i32, month: u32) -> Result<Self, IntervalError> {
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(IntervalError::InvalidMonth(month))?;
        Ok(Self {
            start,
            end: Some(month_end(start)),
        })
    }

    /// Bounded interval from an explicit date pair.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::InvalidInterval { start, end });
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Interval for an admission; open-ended while the resident has not
    /// been discharged.
    pub fn from_admission(
        admitted: NaiveDate,
        discharged: Option<NaiveDate>,
    ) -> Result<Self, IntervalError> {
        if let Some(end) = discharged {
            if admitted > end {
                return Err(IntervalError::InvalidInterval {
                    start: admitted,
                    end,
                });
            }
        }
        Ok(Self {
            start: admitted,
            end: discharged,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }

    /// Overlapping sub-range of two intervals, `None` when they are
    /// disjoint. An open end compares as unbounded future.
    pub fn intersect(&self, other: &DateInterval) -> Option<DateInterval> {
        let start = self.start.max(other.start);
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };

        if let Some(end) = end {
            if end < start {
                return None;
            }
        }

        Some(DateInterval { start, end })
    }

    /// Inclusive day count for a bounded interval (`start == end` counts
    /// as one day). `None` for open-ended intervals.
    pub fn length_in_days(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_days() + 1)
    }

    pub fn contains_day(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |end| date <= end)
    }

    /// Splits a bounded interval at calendar month boundaries, preserving
    /// the overall start and end. Open-ended intervals are returned whole.
    pub(crate) fn split_by_month(&self) -> Vec<DateInterval> {
        self.split_with(month_end)
    }

    /// Splits a bounded interval at calendar year boundaries.
    pub(crate) fn split_by_year(&self) -> Vec<DateInterval> {
        self.split_with(year_end)
    }

    fn split_with(&self, boundary: fn(NaiveDate) -> NaiveDate) -> Vec<DateInterval> {
        let end = match self.end {
            Some(end) => end,
            None => return vec![*self],
        };

        let mut chunks = Vec::new();
        let mut cursor = self.start;
        while cursor <= end {
            let chunk_end = boundary(cursor).min(end);
            chunks.push(DateInterval {
                start: cursor,
                end: Some(chunk_end),
            });
            cursor = chunk_end + Duration::days(1);
        }
        chunks
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("interval start {start} is after end {end}")]
    InvalidInterval { start: NaiveDate, end: NaiveDate },
    #[error("month {0} is out of range (expected 1-12)")]
    InvalidMonth(u32),
    #[error("reporting window must have a bounded end date")]
    OpenWindow,
}

pub(crate) fn days_in_month(year: i32, month: u32) -> i64 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

pub(crate) fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub(crate) fn month_end(date: NaiveDate) -> NaiveDate {
    let last_day = days_in_month(date.year(), date.month()) as u32;
    date.with_day(last_day).unwrap_or(date)
}

fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn single_day_has_length_one() {
        let interval = DateInterval::single_day(day(2024, 4, 1));
        assert_eq!(interval.length_in_days(), Some(1));
        assert!(interval.contains_day(day(2024, 4, 1)));
        assert!(!interval.contains_day(day(2024, 4, 2)));
    }

    #[test]
    fn calendar_month_uses_actual_day_count() {
        let march = DateInterval::calendar_month(2024, 3).expect("march builds");
        assert_eq!(march.length_in_days(), Some(31));

        let leap_february = DateInterval::calendar_month(2024, 2).expect("february builds");
        assert_eq!(leap_february.length_in_days(), Some(29));

        let plain_february = DateInterval::calendar_month(2023, 2).expect("february builds");
        assert_eq!(plain_february.length_in_days(), Some(28));
    }

    #[test]
    fn calendar_month_rejects_out_of_range_month() {
        assert_eq!(
            DateInterval::calendar_month(2024, 13),
            Err(IntervalError::InvalidMonth(13))
        );
    }

    #[test]
    fn range_rejects_reversed_dates() {
        let err = DateInterval::range(day(2024, 3, 10), day(2024, 3, 1));
        assert!(matches!(err, Err(IntervalError::InvalidInterval { .. })));
    }

    #[test]
    fn open_admission_is_unbounded() {
        let interval =
            DateInterval::from_admission(day(2024, 3, 15), None).expect("admission builds");
        assert!(!interval.is_bounded());
        assert_eq!(interval.length_in_days(), None);
        assert!(interval.contains_day(day(2030, 1, 1)));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = DateInterval::range(day(2024, 3, 1), day(2024, 3, 10)).expect("a builds");
        let b = DateInterval::range(day(2024, 3, 11), day(2024, 3, 20)).expect("b builds");
        assert_eq!(a.intersect(&b), None);
        assert_eq!(b.intersect(&a), None);
    }

    #[test]
    fn intersect_clips_open_interval_to_window() {
        let window = DateInterval::calendar_month(2024, 3).expect("window builds");
        let admission =
            DateInterval::from_admission(day(2024, 3, 15), None).expect("admission builds");

        let overlap = window.intersect(&admission).expect("overlap exists");
        assert_eq!(overlap.start(), day(2024, 3, 15));
        assert_eq!(overlap.end(), Some(day(2024, 3, 31)));
        assert_eq!(overlap.length_in_days(), Some(17));
    }

    #[test]
    fn split_by_month_respects_boundaries() {
        let interval = DateInterval::range(day(2024, 1, 20), day(2024, 3, 5)).expect("builds");
        let chunks = interval.split_by_month();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].end(), Some(day(2024, 1, 31)));
        assert_eq!(chunks[1].start(), day(2024, 2, 1));
        assert_eq!(chunks[1].end(), Some(day(2024, 2, 29)));
        assert_eq!(chunks[2].start(), day(2024, 3, 1));
        assert_eq!(chunks[2].end(), Some(day(2024, 3, 5)));
    }

    #[test]
    fn split_by_year_handles_leap_boundary() {
        let interval = DateInterval::range(day(2023, 12, 30), day(2024, 1, 2)).expect("builds");
        let chunks = interval.split_by_year();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].end(), Some(day(2023, 12, 31)));
        assert_eq!(chunks[1].start(), day(2024, 1, 1));
    }

    #[test]
    fn day_count_helpers_track_the_calendar() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2100), 365);
        assert_eq!(days_in_year(2000), 366);
    }
}
