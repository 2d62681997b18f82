use crate::value::Quantity;
use simple_error::SimpleError;
use std::fmt;

/// Errors raised by the network and rational-function algebra
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A port value of the wrong quantity was supplied
    TypeMismatch { expected: Quantity, found: Quantity },
    /// Structurally forbidden connection, e.g. a voltage source in parallel
    IllegalTopology(String),
    /// Expression does not separate into delay x rational function
    NotRationalFunction(String),
    /// Division by an identically zero quantity
    SingularConversion(String),
    /// A degenerate result was rejected by a strict caller
    DegenerateResult(String),
    /// Operation is not defined for the operand combination
    UnsupportedOperation(String),
    InvalidPort(usize),
    DimensionMismatch(String),
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Error::IllegalTopology(msg) => write!(f, "Illegal topology: {}", msg),
            Error::NotRationalFunction(msg) => write!(f, "Not a rational function: {}", msg),
            Error::SingularConversion(msg) => write!(f, "Singular conversion: {}", msg),
            Error::DegenerateResult(msg) => write!(f, "Degenerate result: {}", msg),
            Error::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {}", msg),
            Error::InvalidPort(port) => write!(f, "Invalid port {}", port),
            Error::DimensionMismatch(msg) => write!(f, "Dimension mismatch: {}", msg),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<SimpleError> for Error {
    fn from(err: SimpleError) -> Self {
        Error::Parse(err.as_str().to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
