use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::{catalog::Statistic, metric::DataPoint};

use super::{
    sigv4::{Credentials, Signer},
    MetricSource, QueryRequest, SourceError,
};

pub const SERVICE: &str = "monitoring";
const TARGET: &str = "GraniteServiceVersion20100801.GetMetricStatistics";
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

pub struct CloudWatchConfig {
    pub credentials: Credentials,
    pub region: String,
    // Overrides the regional endpoint, e.g. for a local stand-in.
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

/// CloudWatch `GetMetricStatistics` over the JSON protocol.
pub struct CloudWatch {
    agent: ureq::Agent,
    credentials: Credentials,
    region: String,
    endpoint: String,
    host: String,
}

impl CloudWatch {
    pub fn new(config: CloudWatchConfig) -> Result<Self, SourceError> {
        let endpoint = config
            .endpoint
            .unwrap_or_else(|| format!("https://{}.{}.amazonaws.com/", SERVICE, config.region));
        let url = Url::parse(&endpoint)
            .map_err(|e| SourceError::Transport(format!("invalid endpoint {:?}: {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(SourceError::Transport(format!(
                    "endpoint {:?} has no host",
                    endpoint
                )))
            }
        };
        // Requests are signed for the root path only.
        if url.path() != "/" || url.query().is_some() {
            return Err(SourceError::Transport(format!(
                "endpoint {:?} must not have a path or query string",
                endpoint
            )));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(concat!("rds-metrics/", env!("CARGO_PKG_VERSION")))
            .build();

        Ok(Self {
            agent,
            credentials: config.credentials,
            region: config.region,
            endpoint: url.to_string(),
            host,
        })
    }
}

impl MetricSource for CloudWatch {
    fn query(&self, request: &QueryRequest) -> Result<Vec<DataPoint>, SourceError> {
        let body = serde_json::to_vec(&GetMetricStatisticsInput::from(request))?;
        let signer = Signer {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
        };
        let signed = signer.sign(
            "POST",
            &self.host,
            &[("content-type", CONTENT_TYPE), ("x-amz-target", TARGET)],
            &body,
            Utc::now(),
        )?;

        let mut http_request = self
            .agent
            .post(&self.endpoint)
            .set("content-type", CONTENT_TYPE)
            .set("x-amz-target", TARGET);
        for (name, value) in &signed {
            http_request = http_request.set(name, value);
        }

        debug!(
            "GetMetricStatistics {} {} on {}",
            request.metric_name, request.statistic, self.host
        );
        match http_request.send_bytes(&body) {
            Ok(response) => parse_output(&response.into_string()?, request.statistic),
            Err(ureq::Error::Status(status, response)) => {
                Err(classify_error(status, &response.into_string()?))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(SourceError::Transport(transport.to_string()))
            }
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Dimension<'a> {
    name: &'a str,
    value: &'a str,
}

// Timestamps travel as epoch seconds.
#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct GetMetricStatisticsInput<'a> {
    namespace: &'a str,
    metric_name: &'a str,
    dimensions: [Dimension<'a>; 1],
    start_time: i64,
    end_time: i64,
    period: i64,
    statistics: [Statistic; 1],
}

impl<'a> From<&'a QueryRequest<'a>> for GetMetricStatisticsInput<'a> {
    fn from(request: &'a QueryRequest<'a>) -> Self {
        let (name, value) = request.dimension;
        Self {
            namespace: request.namespace,
            metric_name: request.metric_name,
            dimensions: [Dimension { name, value }],
            start_time: request.window.start.timestamp(),
            end_time: request.window.end.timestamp(),
            period: request.period_seconds,
            statistics: [request.statistic],
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct GetMetricStatisticsOutput {
    #[serde(default)]
    datapoints: Vec<RawDatapoint>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct RawDatapoint {
    timestamp: f64,
    average: Option<f64>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    sample_count: Option<f64>,
    sum: Option<f64>,
}

impl RawDatapoint {
    fn value(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::Average => self.average,
            Statistic::Minimum => self.minimum,
            Statistic::Maximum => self.maximum,
            Statistic::SampleCount => self.sample_count,
            Statistic::Sum => self.sum,
        }
    }

    fn into_data_point(self, statistic: Statistic) -> Result<DataPoint, SourceError> {
        let value = self.value(statistic).ok_or_else(|| {
            SourceError::MalformedResponse(format!("datapoint has no {} value", statistic))
        })?;
        let seconds = self.timestamp.floor();
        let nanos = ((self.timestamp - seconds) * 1e9) as u32;
        let timestamp = DateTime::from_timestamp(seconds as i64, nanos).ok_or_else(|| {
            SourceError::MalformedResponse(format!("invalid timestamp {}", self.timestamp))
        })?;
        Ok(DataPoint { timestamp, value })
    }
}

fn parse_output(body: &str, statistic: Statistic) -> Result<Vec<DataPoint>, SourceError> {
    let output: GetMetricStatisticsOutput = serde_json::from_str(body)?;
    output
        .datapoints
        .into_iter()
        .map(|raw| raw.into_data_point(statistic))
        .collect()
}

#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

fn classify_error(status: u16, body: &str) -> SourceError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_else(|_| ErrorBody {
        kind: String::new(),
        message: body.trim().to_string(),
    });
    // `__type` may be qualified, e.g. "com.amazonaws.monitoring#Throttling".
    let code = match parsed.kind.rsplit('#').next() {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => "Unknown".to_string(),
    };
    let message = parsed.message;

    match code.as_str() {
        "InvalidClientTokenId"
        | "UnrecognizedClientException"
        | "SignatureDoesNotMatch"
        | "IncompleteSignature"
        | "MissingAuthenticationToken"
        | "ExpiredToken"
        | "ExpiredTokenException"
        | "AccessDenied"
        | "AccessDeniedException" => SourceError::Authentication { code, message },
        "Throttling" | "ThrottlingException" | "RequestLimitExceeded" => {
            SourceError::Throttled { code, message }
        }
        "ResourceNotFound" | "ResourceNotFoundException" => SourceError::NotFound { code, message },
        _ => match status {
            401 | 403 => SourceError::Authentication { code, message },
            404 => SourceError::NotFound { code, message },
            429 => SourceError::Throttled { code, message },
            _ => SourceError::Api {
                status,
                code,
                message,
            },
        },
    }
}
