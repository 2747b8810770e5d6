use std::io;

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rdsmetrics::{
    collector::collect,
    config::Config,
    encode::{EncodeStrategy, StreamEncoder},
    source::{MetricSource, QueryRequest, SourceError},
    DataPoint,
};

struct StaticSource {
    data_points: Vec<DataPoint>,
}

impl MetricSource for StaticSource {
    fn query(&self, _request: &QueryRequest) -> Result<Vec<DataPoint>, SourceError> {
        Ok(self.data_points.clone())
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let now = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    let source = StaticSource {
        data_points: vec![
            DataPoint {
                timestamp: now - Duration::seconds(120),
                value: 12.5,
            },
            DataPoint {
                timestamp: now - Duration::seconds(60),
                value: 13.5,
            },
        ],
    };
    let config = Config {
        instance_id: "bench-db".to_string(),
        ..Default::default()
    };

    for encode_strategy in [
        EncodeStrategy::Graphite,
        EncodeStrategy::Json,
        EncodeStrategy::Influxdb,
    ] {
        c.bench_function(&format!("collect_{}", encode_strategy), |b| {
            b.iter(|| {
                let mut encoder = StreamEncoder::new(io::sink(), encode_strategy);
                black_box(collect(&config, now, &source, &mut encoder).unwrap());
            });
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
