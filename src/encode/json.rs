use crate::metric::MetricLine;
use std::io::{Result, Write};

pub fn encode_line<W: Write>(writable: &mut W, line: &MetricLine) -> Result<()> {
    serde_json::to_writer(&mut *writable, line)?;
    writable.write_all(b"\n")
}

#[cfg(test)]
pub mod tests {
    use crate::metric::MetricLine;

    use super::encode_line;

    #[test]
    fn test_encode() {
        let mut buf = Vec::new();
        encode_line(
            &mut buf,
            &MetricLine {
                path: "prod-db.swapusage".to_string(),
                value: 1024.0,
                timestamp: 1_600_000_000,
            },
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"path\":\"prod-db.swapusage\",\"value\":1024.0,\"timestamp\":1600000000}\n"
        );
    }
}
