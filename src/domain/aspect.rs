//! Monitoring aspects exposed by `GET /db-mon`.

use std::str::FromStr;

use crate::error::ServiceError;

/// Database health check to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorAspect {
    /// Round-trip a trivial query.
    Conn,
    /// Count rows in the character table.
    Records,
}

impl FromStr for MonitorAspect {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conn" => Ok(Self::Conn),
            "records" => Ok(Self::Records),
            _ => Err(ServiceError::UnrecognizedAspect),
        }
    }
}
