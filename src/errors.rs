//! Centralized error handling for atmos_vert
//!
//! Numeric routines mask physically invalid layers instead of failing, so the
//! variants here cover malformed input: wrong dimensionality, missing
//! dimensions, bad configuration and lookups that come up empty.

use std::fmt;

/// Main error type for atmos_vert operations
#[derive(Debug)]
pub enum AtmosVertError {
    /// Named dimension not present on a labeled array
    DimensionNotFound { dim: String },

    /// Array has a dimensionality the operation does not support
    DimensionMismatch { expected: String, found: usize },

    /// Two inputs that must agree in shape do not
    ShapeMismatch { message: String },

    /// Positional axis out of range
    InvalidAxis { axis: isize, ndim: usize },

    /// Vertical axis too short for the requested operation
    TooFewLevels { required: usize, found: usize },

    /// Strict attribute lookup found nothing on the object or its ancestors
    AttributeNotFound { attr: String, object: String },

    /// Inheritance chain deeper than the configured limit (usually a cycle)
    InheritanceDepthExceeded { attr: String, depth: usize },

    /// Object without a name passed where names are used as keys
    MissingName { index: usize },

    /// User data that failed validation
    InvalidConfig { message: String },

    /// Unknown user data module name
    UnknownModule { name: String },

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// I/O operation errors
    IoError(std::io::Error),

    /// JSON (de)serialization errors
    JsonError(serde_json::Error),

    /// Generic error for ad hoc messages
    Generic(String),
}

impl fmt::Display for AtmosVertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtmosVertError::DimensionNotFound { dim } => {
                write!(f, "Dimension '{}' not found on array", dim)
            }
            AtmosVertError::DimensionMismatch { expected, found } => {
                write!(f, "Expected {} dimensions, found {}", expected, found)
            }
            AtmosVertError::ShapeMismatch { message } => write!(f, "Shape mismatch: {}", message),
            AtmosVertError::InvalidAxis { axis, ndim } => write!(
                f,
                "Axis {} is out of bounds for array with {} dimensions",
                axis, ndim
            ),
            AtmosVertError::TooFewLevels { required, found } => write!(
                f,
                "At least {} vertical levels required, found {}",
                required, found
            ),
            AtmosVertError::AttributeNotFound { attr, object } => {
                write!(f, "Attribute '{}' not found in parent of {}", attr, object)
            }
            AtmosVertError::InheritanceDepthExceeded { attr, depth } => write!(
                f,
                "Lookup of attribute '{}' exceeded inheritance depth {}",
                attr, depth
            ),
            AtmosVertError::MissingName { index } => {
                write!(f, "Object at position {} has no name", index)
            }
            AtmosVertError::InvalidConfig { message } => {
                write!(f, "Invalid user data: {}", message)
            }
            AtmosVertError::UnknownModule { name } => {
                write!(f, "Unknown user data module '{}'", name)
            }
            AtmosVertError::ArrayError(e) => write!(f, "Array error: {}", e),
            AtmosVertError::IoError(e) => write!(f, "I/O error: {}", e),
            AtmosVertError::JsonError(e) => write!(f, "JSON error: {}", e),
            AtmosVertError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AtmosVertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtmosVertError::ArrayError(e) => Some(e),
            AtmosVertError::IoError(e) => Some(e),
            AtmosVertError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ndarray::ShapeError> for AtmosVertError {
    fn from(error: ndarray::ShapeError) -> Self {
        AtmosVertError::ArrayError(error)
    }
}

impl From<std::io::Error> for AtmosVertError {
    fn from(error: std::io::Error) -> Self {
        AtmosVertError::IoError(error)
    }
}

impl From<serde_json::Error> for AtmosVertError {
    fn from(error: serde_json::Error) -> Self {
        AtmosVertError::JsonError(error)
    }
}

impl From<String> for AtmosVertError {
    fn from(error: String) -> Self {
        AtmosVertError::Generic(error)
    }
}

impl From<&str> for AtmosVertError {
    fn from(error: &str) -> Self {
        AtmosVertError::Generic(error.to_string())
    }
}

/// Result type alias for atmos_vert operations
pub type Result<T> = std::result::Result<T, AtmosVertError>;
