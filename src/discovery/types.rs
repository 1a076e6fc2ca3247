use std::fmt;
use thiserror::Error;

/// Platform-assigned identifier of a compute instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MachineId(pub String);

impl MachineId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The name exists nowhere, or has no record of the requested type.
    #[error("no records found")]
    NoRecords,
    /// Timeout, refused connection, malformed response...
    #[error("name service failure: {0}")]
    Transport(String),
}
