use crate::metric::MetricLine;
use std::io::{Result, Write};

// `<path> <value> <timestamp>`; whole values keep their `.0`.
pub fn encode_line<W: Write>(writable: &mut W, line: &MetricLine) -> Result<()> {
    writeln!(writable, "{} {:?} {}", line.path, line.value, line.timestamp)
}
