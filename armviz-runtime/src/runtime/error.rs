// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    /// Filesystem error.
    Io(io::Error),
    /// Configuration could not be parsed.
    Config(toml::de::Error),
    /// Configuration was parsed but is not usable.
    Invalid(String),
    /// Trace or export writer error.
    Csv(csv::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Config(e) => write!(f, "configuration error: {}", e),
            Error::Invalid(reason) => write!(f, "invalid configuration: {}", reason),
            Error::Csv(e) => write!(f, "csv error: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Invalid(_) => None,
            Error::Csv(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(value)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::Csv(value)
    }
}
