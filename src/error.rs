use std::error;
use std::ffi::OsString;
use std::fmt;
use std::io;

#[derive(Debug)]
pub(crate) struct InvalidVarError {
    pub(crate) val: OsString,
    pub(crate) reason: InvalidVarReason,
}

#[derive(Debug)]
pub(crate) enum InvalidVarReason {
    InvalidUtf8,
    ParseError,
}

impl InvalidVarError {
    pub(crate) const fn invalid_utf8(val: OsString) -> Self {
        Self {
            val,
            reason: InvalidVarReason::InvalidUtf8,
        }
    }

    pub(crate) const fn parse_error(val: OsString) -> Self {
        Self {
            val,
            reason: InvalidVarReason::ParseError,
        }
    }
}

impl fmt::Display for InvalidVarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            InvalidVarReason::InvalidUtf8 => write!(f, "invalid utf8: {:?}", self.val),
            InvalidVarReason::ParseError => write!(f, "value could not be parsed: {:?}", self.val),
        }
    }
}

impl error::Error for InvalidVarError {}

#[derive(Debug)]
pub(crate) struct MissingVarError(pub &'static str);

impl fmt::Display for MissingVarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not set", self.0)
    }
}

impl error::Error for MissingVarError {}

/// A malformed line in one of the lexicon files.
#[derive(Debug)]
pub(crate) struct LoadError {
    pub(crate) line: usize,
    pub(crate) reason: LoadErrorReason,
}

#[derive(Debug)]
pub(crate) enum LoadErrorReason {
    Io(Box<io::Error>),
    MissingField(&'static str),
    BadComponent(String),
    DimensionMismatch { expected: usize, found: usize },
}

impl LoadError {
    pub(crate) const fn new(line: usize, reason: LoadErrorReason) -> Self {
        Self {
            line,
            reason,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.reason {
            LoadErrorReason::Io(err) => err.fmt(f),
            LoadErrorReason::MissingField(field) => write!(f, "missing {}", field),
            LoadErrorReason::BadComponent(val) => write!(f, "invalid vector component {:?}", val),
            LoadErrorReason::DimensionMismatch { expected, found } =>
                write!(f, "expected {} dimensions, found {}", expected, found),
        }
    }
}

impl error::Error for LoadError {}
