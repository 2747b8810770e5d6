use std::{io, process, time::Duration};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use log::warn;
use rdsmetrics::{
    collector::collect,
    config::{Config, DEFAULT_FETCH_AGE},
    encode::{EncodeStrategy, StreamEncoder},
    source::{
        cloudwatch::{CloudWatch, CloudWatchConfig},
        Credentials,
    },
    status::Status,
};

/// Fetch Amazon RDS metrics from CloudWatch.
#[derive(Parser)]
#[command(name = "rds-metrics", version)]
struct Cli {
    /// AWS access key id
    #[arg(short = 'a', long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    aws_access_key: String,
    /// AWS secret access key
    #[arg(short = 'k', long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    aws_secret_access_key: String,
    /// AWS session token, for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    aws_session_token: Option<String>,
    /// AWS region (such as us-east-1)
    #[arg(short = 'r', long, env = "AWS_REGION", default_value = "us-east-1")]
    aws_region: String,
    /// RDS instance identifier
    #[arg(short = 'i', long)]
    instance_id: String,
    /// Text to prepend to every metric path (default: the instance identifier)
    #[arg(short = 's', long, default_value = "")]
    scheme: String,
    /// How many seconds ago the query window ends
    #[arg(short = 'f', long, default_value_t = DEFAULT_FETCH_AGE)]
    fetch_age: u64,
    /// Statistics type: average, minimum, maximum, samplecount or sum
    #[arg(short = 't', long, default_value = "average")]
    statistics_type: String,
    /// Output format: graphite, json or influxdb
    #[arg(long, default_value_t = EncodeStrategy::Graphite)]
    format: EncodeStrategy,
    /// CloudWatch endpoint URL, overriding the regional one
    #[arg(long)]
    endpoint: Option<String>,
    /// Per request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let status = match run(cli) {
        Ok(status) => status,
        Err(e) => {
            println!("Error: {:#}", e);
            Status::Critical
        }
    };
    process::exit(status.exit_code());
}

fn run(cli: Cli) -> anyhow::Result<Status> {
    let config = Config {
        instance_id: cli.instance_id,
        scheme: cli.scheme,
        fetch_age: cli.fetch_age,
        statistic: cli.statistics_type,
    };
    let source = CloudWatch::new(CloudWatchConfig {
        credentials: Credentials {
            access_key_id: cli.aws_access_key,
            secret_access_key: cli.aws_secret_access_key,
            session_token: cli.aws_session_token,
        },
        region: cli.aws_region,
        endpoint: cli.endpoint,
        timeout: Duration::from_secs(cli.timeout),
    })
    .context("error setting up the CloudWatch client")?;

    let mut encoder = StreamEncoder::new(io::stdout().lock(), cli.format);
    let result = collect(&config, Utc::now(), &source, &mut encoder);
    drop(encoder);

    let status = Status::from(&result);
    if let Err(e) = result {
        warn!("run finished {}", status);
        println!("Error: {}", e);
    }
    Ok(status)
}
