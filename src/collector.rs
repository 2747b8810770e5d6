use crate::{
    catalog::CATALOG,
    config::{Config, ConfigError},
    encode::Encoder,
    metric::MetricLine,
    source::{MetricSource, QueryRequest, SourceError},
    window::PERIOD_SECONDS,
};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("error querying {metric}: {source}")]
    Query {
        metric: &'static str,
        source: SourceError,
    },
    #[error("error writing metric line: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub queried: usize,
    pub written: usize,
    // Metrics the backend had no data point for, e.g. ReplicaLag on a primary.
    pub absent: Vec<&'static str>,
}

/// Runs one collection pass over the whole catalog.
///
/// The configuration is resolved before anything is queried. Metrics are
/// queried one at a time in catalog order and every rendered line is handed to
/// the encoder as soon as it exists. The first failed query ends the pass;
/// lines written before it stay written.
pub fn collect<S, E>(
    config: &Config,
    now: DateTime<Utc>,
    source: &S,
    encoder: &mut E,
) -> Result<Summary, CollectError>
where
    S: MetricSource + ?Sized,
    E: Encoder + ?Sized,
{
    let plan = config.resolve(now)?;
    debug!(
        "collecting {} for {} between {} and {}",
        plan.statistic, config.instance_id, plan.window.start, plan.window.end
    );

    let mut summary = Summary::default();
    for entry in CATALOG.iter() {
        let request = QueryRequest::new(
            &config.instance_id,
            entry.name,
            plan.window,
            PERIOD_SECONDS,
            plan.statistic,
        );
        let data_points = source.query(&request).map_err(|source| {
            error!("query for {} failed: {}", entry.name, source);
            CollectError::Query {
                metric: entry.name,
                source,
            }
        })?;
        summary.queried += 1;

        match data_points.first() {
            Some(data_point) => {
                if !plan.window.contains(data_point.timestamp) {
                    debug!(
                        "data point for {} at {} lies outside the queried window",
                        entry.name, data_point.timestamp
                    );
                }
                encoder.encode_line(&MetricLine::new(&plan.prefix, entry.name, data_point))?;
                summary.written += 1;
            }
            None => {
                debug!("no data point for {} ({}), skipping", entry.name, entry.unit);
                summary.absent.push(entry.name);
            }
        }
    }

    info!(
        "collected {} of {} metrics for {}",
        summary.written, summary.queried, config.instance_id
    );
    Ok(summary)
}
