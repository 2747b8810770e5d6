use crate::metric::MetricLine;
use std::{
    fmt,
    io::{Result, Write},
    str::FromStr,
};
use thiserror::Error;

mod graphite;
mod influxdb;
mod json;

/// Line format handed to the collector that consumes our output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodeStrategy {
    #[default]
    Graphite,
    Json,
    Influxdb,
}

impl EncodeStrategy {
    fn as_str(&self) -> &'static str {
        match self {
            EncodeStrategy::Graphite => "graphite",
            EncodeStrategy::Json => "json",
            EncodeStrategy::Influxdb => "influxdb",
        }
    }
}

impl fmt::Display for EncodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown output format {0:?}, expected one of graphite, json, influxdb")]
pub struct UnknownStrategy(String);

impl FromStr for EncodeStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "graphite" => Ok(EncodeStrategy::Graphite),
            "json" => Ok(EncodeStrategy::Json),
            "influxdb" => Ok(EncodeStrategy::Influxdb),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

pub trait Encoder {
    fn encode_line(&mut self, line: &MetricLine) -> Result<()>;
}

/// Writes each line to the sink and flushes it right away, so lines already
/// produced survive a later failure of the run.
pub struct StreamEncoder<W: Write> {
    writer: W,
    encode_strategy: EncodeStrategy,
}

impl<W: Write> StreamEncoder<W> {
    pub fn new(writer: W, encode_strategy: EncodeStrategy) -> Self {
        Self {
            writer,
            encode_strategy,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Encoder for StreamEncoder<W> {
    fn encode_line(&mut self, line: &MetricLine) -> Result<()> {
        match self.encode_strategy {
            EncodeStrategy::Graphite => graphite::encode_line(&mut self.writer, line)?,
            EncodeStrategy::Json => json::encode_line(&mut self.writer, line)?,
            EncodeStrategy::Influxdb => influxdb::encode_line(&mut self.writer, line)?,
        }
        self.writer.flush()
    }
}
