use std::fmt::{Display, Formatter};

use config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    Internal(String),
    /// Malformed trace input.
    Parse(String),
    /// Invalid or missing configuration.
    Config(String),
    Io(String),
    /// A frame table needs at least one frame.
    InvalidCapacity(usize),
    /// A refresh period or working-set window must be positive.
    InvalidWindow { name: &'static str, value: u64 },
    /// The optimal policy was asked to replay before its future index was built.
    UninitializedFutureIndex,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Internal(s) | Error::Parse(s) | Error::Config(s) | Error::Io(s) => {
                write!(f, "{}", s)
            }
            Error::InvalidCapacity(n) => {
                write!(f, "invalid frame capacity {}, need at least one frame", n)
            }
            Error::InvalidWindow { name, value } => {
                write!(f, "invalid {} {}, must be larger than zero", name, value)
            }
            Error::UninitializedFutureIndex => {
                write!(f, "future index must be built before replaying with the optimal policy")
            }
        }
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! parse_err {
    ($($arg:tt)*) => {
        $crate::error::Error::Parse(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! config_err {
    ($($arg:tt)*) => {
        $crate::error::Error::Config(format!($($arg)*))
    };
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<log::ParseLevelError> for Error {
    fn from(err: log::ParseLevelError) -> Self {
        Error::Config(err.to_string())
    }
}
