use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricCatalogEntry {
    pub name: &'static str,
    // Informational only, never rendered.
    pub unit: &'static str,
}

const fn entry(name: &'static str, unit: &'static str) -> MetricCatalogEntry {
    MetricCatalogEntry { name, unit }
}

/// Every RDS metric queried on a run, in output order.
pub const CATALOG: [MetricCatalogEntry; 16] = [
    entry("BinLogDiskUsage", "Bytes"),
    entry("CPUUtilization", "Percent"),
    entry("DatabaseConnections", "Count"),
    entry("DiskQueueDepth", "Count"),
    entry("FreeStorageSpace", "Bytes"),
    entry("FreeableMemory", "Bytes"),
    entry("NetworkReceiveThroughput", "Bytes"),
    entry("NetworkTransmitThroughput", "Bytes"),
    entry("ReadIOPS", "Count/Second"),
    entry("ReadLatency", "Seconds"),
    entry("ReadThroughput", "Bytes/Second"),
    entry("ReplicaLag", "Seconds"),
    entry("SwapUsage", "Bytes"),
    entry("WriteIOPS", "Count/Second"),
    entry("WriteLatency", "Seconds"),
    entry("WriteThroughput", "Bytes/Second"),
];

/// Aggregation the backend applies to the raw samples of each period.
///
/// Variant names are the backend's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Statistic {
    #[default]
    Average,
    Minimum,
    Maximum,
    SampleCount,
    Sum,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::Average,
        Statistic::Minimum,
        Statistic::Maximum,
        Statistic::SampleCount,
        Statistic::Sum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Minimum => "Minimum",
            Statistic::Maximum => "Maximum",
            Statistic::SampleCount => "SampleCount",
            Statistic::Sum => "Sum",
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            Statistic::Average => "average",
            Statistic::Minimum => "minimum",
            Statistic::Maximum => "maximum",
            Statistic::SampleCount => "samplecount",
            Statistic::Sum => "sum",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown statistics type {0:?}, expected one of average, minimum, maximum, samplecount, sum")]
pub struct UnknownStatistic(pub String);

impl FromStr for Statistic {
    type Err = UnknownStatistic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.to_lowercase();
        Statistic::ALL
            .into_iter()
            .find(|statistic| statistic.keyword() == keyword)
            .ok_or_else(|| UnknownStatistic(s.to_string()))
    }
}
