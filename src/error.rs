//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    Config(serde_yaml::Error),
    InvalidConfigurationValue(String),
    Io(std::io::Error),
    Other(String),
    PreconditionNotMet(String),
    SourceUnavailable(String),
    UnknownServiceHandler(String),
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Config(err)
    }
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "{}", e),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::Other(msg) => write!(f, "{}", msg),
            Error::PreconditionNotMet(msg) => {
                write!(f, "Operation rejected in the current state: {}", msg)
            }
            Error::SourceUnavailable(msg) => {
                write!(f, "Location source could not be started: {}", msg)
            }
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}
