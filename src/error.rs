//! Error types for game construction and template data.

use std::fmt;

/// Errors raised while building a game or resolving template data.
///
/// Gameplay rejections (a blocked move, an out-of-range attack) are not
/// errors; gated operations report those as `bool` results. This type covers
/// configuration and data faults only, which are fatal to the operation that
/// hit them.
#[derive(Debug)]
pub enum Error {
    /// A template name was requested that the factory does not know.
    UnknownEntityKind {
        /// Template category (`"enemy"`, `"item"`, `"player"`).
        category: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
    /// A random pick was requested from a category with no templates.
    EmptyTemplateSet {
        /// Template category (`"enemy"`, `"item"`).
        category: &'static str,
    },
    /// Grid dimensions must both be at least 1.
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// A template carries values the engine cannot run with.
    InvalidTemplate {
        /// The offending template's name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Template JSON failed to parse.
    Parse(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownEntityKind { category, name } => {
                write!(f, "unknown {category} template: {name:?}")
            }
            Error::EmptyTemplateSet { category } => {
                write!(f, "no {category} templates configured")
            }
            Error::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions: {width}x{height}")
            }
            Error::InvalidTemplate { name, reason } => {
                write!(f, "invalid template {name:?}: {reason}")
            }
            Error::Parse(err) => write!(f, "template parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err)
    }
}

/// Result type for fallible game-construction operations.
pub type GameResult<T> = Result<T, Error>;
