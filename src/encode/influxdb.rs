use crate::metric::MetricLine;
use std::io::{Result, Write};

// Line protocol with second precision: `<measurement> value=<value> <timestamp>`.
pub fn encode_line<W: Write>(writable: &mut W, line: &MetricLine) -> Result<()> {
    writeln!(
        writable,
        "{} value={:?} {}",
        escape_measurement(&line.path),
        line.value,
        line.timestamp
    )
}

fn escape_measurement(path: &str) -> String {
    path.replace(',', "\\,").replace(' ', "\\ ")
}
