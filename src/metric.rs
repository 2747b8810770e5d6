use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single aggregated sample as reported by the monitoring backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One rendered output line: `<path> <value> <timestamp>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricLine {
    pub path: String,
    pub value: f64,
    // Sample time from the backend, truncated to whole seconds.
    pub timestamp: i64,
}

impl MetricLine {
    pub fn new(prefix: &str, metric_name: &str, data_point: &DataPoint) -> Self {
        Self {
            path: format!("{}.{}", prefix, metric_name.to_lowercase()),
            value: data_point.value,
            timestamp: data_point.timestamp.timestamp(),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use chrono::{TimeZone, Utc};

    use super::{DataPoint, MetricLine};

    #[test]
    fn test_metric_line_lowercases_name() {
        let data_point = DataPoint {
            timestamp: Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
            value: 12.5,
        };
        let line = MetricLine::new("db-1", "CPUUtilization", &data_point);
        assert_eq!(line.path, "db-1.cpuutilization");
        assert_eq!(line.value, 12.5);
        assert_eq!(line.timestamp, 1_600_000_000);
    }

    #[test]
    fn test_metric_line_truncates_subsecond_timestamp() {
        let data_point = DataPoint {
            timestamp: Utc.timestamp_opt(1_600_000_000, 999_000_000).unwrap(),
            value: 1.0,
        };
        let line = MetricLine::new("prefix", "ReadIOPS", &data_point);
        assert_eq!(line.timestamp, 1_600_000_000);
    }
}
