use chrono::{DateTime, Duration, Utc};

// Span of every query window, in seconds.
pub const LOOKBACK_SECONDS: i64 = 120;
// Size of the aggregation bucket requested from the backend, in seconds.
pub const PERIOD_SECONDS: i64 = 60;

/// The slice of time a run queries, `[start, end)`.
///
/// The window always spans `LOOKBACK_SECONDS` and ends `fetch_age` seconds
/// before the moment it was resolved, compensating for the delay before the
/// backend reports a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Returns `None` when a bound falls outside the representable time range.
    pub fn resolve(now: DateTime<Utc>, fetch_age: Duration) -> Option<Self> {
        let end = now.checked_sub_signed(fetch_age)?;
        let start = end.checked_sub_signed(Duration::seconds(LOOKBACK_SECONDS))?;
        Some(Self { start, end })
    }

    // Half-open: `[start, end)`.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
pub mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::{TimeWindow, LOOKBACK_SECONDS};

    #[test]
    fn test_window_default_fetch_age() {
        let now = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let window = TimeWindow::resolve(now, Duration::seconds(60)).unwrap();
        assert_eq!(window.end, Utc.timestamp_opt(1_599_999_940, 0).unwrap());
        assert_eq!(window.start, Utc.timestamp_opt(1_599_999_820, 0).unwrap());
    }

    #[test]
    fn test_window_span_is_fixed() {
        let now = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        for fetch_age in [0, 1, 60, 300, 86_400] {
            let window = TimeWindow::resolve(now, Duration::seconds(fetch_age)).unwrap();
            assert_eq!(window.span(), Duration::seconds(LOOKBACK_SECONDS));
            assert_eq!(now - window.end, Duration::seconds(fetch_age));
            assert!(window.start < window.end);
        }
    }

    #[test]
    fn test_window_contains() {
        let now = Utc.timestamp_opt(1000, 0).unwrap();
        let window = TimeWindow::resolve(now, Duration::zero()).unwrap();
        assert!(!window.contains(Utc.timestamp_opt(879, 0).unwrap()));
        assert!(window.contains(Utc.timestamp_opt(880, 0).unwrap()));
        assert!(window.contains(Utc.timestamp_opt(999, 0).unwrap()));
        assert!(!window.contains(Utc.timestamp_opt(1000, 0).unwrap()));
    }

    #[test]
    fn test_window_out_of_range() {
        assert_eq!(
            TimeWindow::resolve(DateTime::<Utc>::MIN_UTC, Duration::seconds(60)),
            None
        );
        assert_eq!(
            TimeWindow::resolve(
                DateTime::<Utc>::MIN_UTC + Duration::seconds(100),
                Duration::zero()
            ),
            None
        );
    }
}
