use crate::collector::{CollectError, Summary};
use std::fmt;

/// Result signal understood by the invoking scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    // Never produced by a collection pass, kept for the scheduler's contract.
    Warning,
    Critical,
}

impl Status {
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
        })
    }
}

impl From<&Result<Summary, CollectError>> for Status {
    fn from(result: &Result<Summary, CollectError>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(_) => Status::Critical,
        }
    }
}
