use crate::{
    catalog::{Statistic, UnknownStatistic},
    window::TimeWindow,
};
use chrono::{DateTime, Duration, Utc};
use std::num::TryFromIntError;
use thiserror::Error;

pub const DEFAULT_FETCH_AGE: u64 = 60;

pub struct Config {
    // RDS instance identifier, used as the query dimension.
    pub instance_id: String,
    // Text prepended to every metric path. Empty means the instance id.
    pub scheme: String,
    // How many seconds in the past the query window ends.
    pub fetch_age: u64,
    // One of average, minimum, maximum, samplecount, sum (any case).
    pub statistic: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance_id: String::new(),
            scheme: String::new(),
            fetch_age: DEFAULT_FETCH_AGE,
            statistic: "average".to_string(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("instance id must not be empty")]
    EmptyInstanceId,
    #[error(transparent)]
    Statistic(#[from] UnknownStatistic),
    #[error("error converting fetch_age to i64")]
    FetchAgeFormatError(TryFromIntError),
    #[error("fetch_age of {0} seconds reaches outside the representable time range")]
    FetchAgeOutOfRange(u64),
}

/// Everything a collection pass needs, resolved once before any query.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub window: TimeWindow,
    pub statistic: Statistic,
    pub prefix: String,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_id.is_empty() {
            return Err(ConfigError::EmptyInstanceId);
        }
        self.statistic.parse::<Statistic>()?;
        self.fetch_age_duration()?;
        Ok(())
    }

    pub fn prefix(&self) -> &str {
        match self.scheme.is_empty() {
            true => &self.instance_id,
            false => &self.scheme,
        }
    }

    pub fn resolve(&self, now: DateTime<Utc>) -> Result<Plan, ConfigError> {
        self.validate()?;
        let window = TimeWindow::resolve(now, self.fetch_age_duration()?)
            .ok_or(ConfigError::FetchAgeOutOfRange(self.fetch_age))?;

        Ok(Plan {
            window,
            statistic: self.statistic.parse()?,
            prefix: self.prefix().to_string(),
        })
    }

    fn fetch_age_duration(&self) -> Result<Duration, ConfigError> {
        let seconds: i64 = self
            .fetch_age
            .try_into()
            .map_err(ConfigError::FetchAgeFormatError)?;
        Duration::try_seconds(seconds).ok_or(ConfigError::FetchAgeOutOfRange(self.fetch_age))
    }
}
