//! Operation handlers.
//!
//! Each handler takes the matrix produced by ingestion (`None` when the request carried no
//! upload) and returns the response body text or an [`ApiError`].

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult, ClientError, MatrixError};
use crate::matrix::Matrix;

pub const BAD_REQUEST_PREFIX: &str = "Bad request : ";
pub const MATRIX_NOT_PROVIDED: &str = "matrix not provided.";
pub const NON_DIGIT_FOUND: &str = "non-digit character found.";
pub const ARITHMETIC_OVERFLOW: &str = "arithmetic overflow.";
pub const NOT_RECTANGULAR: &str = "matrix is not rectangular.";

fn bad_request(message: &str) -> ClientError {
    ClientError::bad_request(format!("{}{}", BAD_REQUEST_PREFIX, message))
}

impl From<MatrixError> for ApiError {
    fn from(err: MatrixError) -> Self {
        let message = match &err {
            MatrixError::NonNumericCell { .. } => NON_DIGIT_FOUND,
            MatrixError::Overflow => ARITHMETIC_OVERFLOW,
            MatrixError::RaggedRow { .. } => NOT_RECTANGULAR,
        };
        bad_request(message).with_cause(err).into()
    }
}

fn require(matrix: Option<&Matrix>) -> ApiResult<&Matrix> {
    matrix.ok_or_else(|| bad_request(MATRIX_NOT_PROVIDED).into())
}

pub fn echo(matrix: Option<&Matrix>) -> ApiResult<String> {
    Ok(require(matrix)?.render())
}

pub fn invert(matrix: Option<&Matrix>) -> ApiResult<String> {
    Ok(require(matrix)?.transpose()?.render())
}

pub fn flatten(matrix: Option<&Matrix>) -> ApiResult<String> {
    Ok(require(matrix)?.flatten())
}

pub fn sum(matrix: Option<&Matrix>) -> ApiResult<String> {
    Ok(require(matrix)?.sum()?.to_string())
}

pub fn multiply(matrix: Option<&Matrix>) -> ApiResult<String> {
    Ok(require(matrix)?.product()?.to_string())
}

/// The five operations, shared by the router and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Return the matrix as uploaded
    Echo,
    /// Swap rows and columns
    Invert,
    /// Return every cell on one line
    Flatten,
    /// Add every cell
    Sum,
    /// Multiply every cell
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Echo,
        Operation::Invert,
        Operation::Flatten,
        Operation::Sum,
        Operation::Multiply,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Echo => "echo",
            Operation::Invert => "invert",
            Operation::Flatten => "flatten",
            Operation::Sum => "sum",
            Operation::Multiply => "multiply",
        }
    }

    /// Route the operation is served on.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Echo => "/echo",
            Operation::Invert => "/invert",
            Operation::Flatten => "/flatten",
            Operation::Sum => "/sum",
            Operation::Multiply => "/multiply",
        }
    }

    pub fn apply(self, matrix: Option<&Matrix>) -> ApiResult<String> {
        match self {
            Operation::Echo => echo(matrix),
            Operation::Invert => invert(matrix),
            Operation::Flatten => flatten(matrix),
            Operation::Sum => sum(matrix),
            Operation::Multiply => multiply(matrix),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
