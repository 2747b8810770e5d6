use crate::{catalog::Statistic, metric::DataPoint, window::TimeWindow};
use thiserror::Error;

pub mod cloudwatch;
mod sigv4;

pub use sigv4::Credentials;

pub const NAMESPACE: &str = "AWS/RDS";
pub const INSTANCE_DIMENSION: &str = "DBInstanceIdentifier";

/// A point-statistics query for a single metric of a single instance.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest<'a> {
    pub namespace: &'static str,
    pub metric_name: &'a str,
    pub dimension: (&'static str, &'a str),
    pub window: TimeWindow,
    pub period_seconds: i64,
    pub statistic: Statistic,
}

impl<'a> QueryRequest<'a> {
    pub fn new(
        instance_id: &'a str,
        metric_name: &'a str,
        window: TimeWindow,
        period_seconds: i64,
        statistic: Statistic,
    ) -> Self {
        Self {
            namespace: NAMESPACE,
            metric_name,
            dimension: (INSTANCE_DIMENSION, instance_id),
            window,
            period_seconds,
            statistic,
        }
    }
}

/// Something that answers metric statistics queries.
///
/// Returns the data points the backend has for the request, in backend order.
/// An empty result is not an error.
pub trait MetricSource {
    fn query(&self, request: &QueryRequest) -> Result<Vec<DataPoint>, SourceError>;
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("authentication failed ({code}): {message}")]
    Authentication { code: String, message: String },
    #[error("request throttled ({code}): {message}")]
    Throttled { code: String, message: String },
    #[error("resource not found ({code}): {message}")]
    NotFound { code: String, message: String },
    #[error("monitoring api error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("error sending request: {0}")]
    Transport(String),
    #[error("error reading response body: {0}")]
    Body(#[from] std::io::Error),
    #[error("error signing request: {0}")]
    Signing(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::MalformedResponse(err.to_string())
    }
}
