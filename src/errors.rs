// src/errors.rs

//! Resolution errors and crate-wide error aliases.
//!
//! [`ResolveError`] is what the graph reports; [`StabledagError`] is what the
//! binary side (manifest loading, CLI) reports.

use thiserror::Error;

/// An element depends on an identity that was never added to the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("looking up dependency {dependency:?} of {dependent:?}: unknown dependency")]
pub struct UnknownDependency<T> {
    /// The element whose dependency set holds the unknown identity.
    pub dependent: T,
    /// The identity that is not a known element.
    pub dependency: T,
}

/// Failure to resolve a dependency graph.
///
/// Neither kind is retriable: the graph has to be fixed before resolving
/// again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError<T> {
    /// Raised by validation, before any element is produced.
    #[error("validating dependency graph")]
    UnknownDependency(#[source] UnknownDependency<T>),

    /// At least two elements depend on each other, directly or transitively
    /// (a self-dependency counts). Cycle membership is not part of the error;
    /// see [`ResolveIter::unresolved`](crate::dag::ResolveIter::unresolved).
    #[error("circular dependency")]
    CircularDependency,
}

impl<T> ResolveError<T> {
    pub fn is_unknown_dependency(&self) -> bool {
        matches!(self, ResolveError::UnknownDependency(_))
    }

    pub fn is_circular_dependency(&self) -> bool {
        matches!(self, ResolveError::CircularDependency)
    }

    /// The offending dependency identity, if this is an unknown-dependency
    /// error.
    pub fn unknown_dependency(&self) -> Option<&T> {
        match self {
            ResolveError::UnknownDependency(err) => Some(&err.dependency),
            ResolveError::CircularDependency => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum StabledagError {
    #[error("Manifest error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Resolution failed: {0}")]
    Resolve(String),
}

impl<T: std::fmt::Debug> From<ResolveError<T>> for StabledagError {
    fn from(err: ResolveError<T>) -> Self {
        // Flatten the source chain; the generic identity can't travel further.
        let msg = match &err {
            ResolveError::UnknownDependency(inner) => format!("{err}: {inner}"),
            ResolveError::CircularDependency => err.to_string(),
        };
        StabledagError::Resolve(msg)
    }
}

pub type Result<T> = std::result::Result<T, StabledagError>;
