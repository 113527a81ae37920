//! Error types for assetforge
//!
//! Uses `thiserror` for library errors. Every resolution failure carries the
//! kind that caused it so a human can map the failure back to an input.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::application::MaterializeError;
use crate::config::ConfigError;
use crate::domain::ports::StateStoreError;
use crate::domain::value_objects::{AssetKind, InvalidKind};

/// Result type alias for top-level operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// A validation failure scoped to one input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted field path, e.g. `networking.machineNetwork[0].cidr`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_kinds(kinds: &[AssetKind]) -> String {
    kinds
        .iter()
        .map(AssetKind::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_errors(errors: &[ResolveError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Graph construction errors (configuration errors, never retried)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("asset kind '{kind}' is registered more than once")]
    DuplicateKind { kind: AssetKind },

    #[error("asset '{kind}' depends on unknown kind '{dependency}'")]
    UnknownDependency {
        kind: AssetKind,
        dependency: AssetKind,
    },

    #[error("dependency cycle detected: {}", join_kinds(members))]
    Cycle { members: Vec<AssetKind> },
}

/// Failure reported by a single asset's `generate`
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid configuration:\n{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("dependency '{kind}' was not declared")]
    UndeclaredDependency { kind: AssetKind },

    #[error("generation cancelled")]
    Cancelled,

    #[error("cannot read {}: {error}", path.display())]
    Input {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error(transparent)]
    InvalidKind(#[from] InvalidKind),

    #[error("{0}")]
    Other(String),
}

/// What a session remembers about a kind whose resolution failed.
///
/// The original error goes to the caller that owned the generation gate;
/// everyone asking later gets this summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    pub message: String,
    pub failing_kinds: Vec<AssetKind>,
    pub field_errors: Vec<(AssetKind, FieldError)>,
}

impl RecordedFailure {
    pub fn from_error(error: &ResolveError) -> Self {
        Self {
            message: error.to_string(),
            failing_kinds: error.failing_kinds(),
            field_errors: error.field_errors(),
        }
    }

    /// Failure recorded when the generating thread unwound without finishing
    pub fn panicked(kind: &AssetKind) -> Self {
        Self {
            message: format!("generation of '{kind}' panicked"),
            failing_kinds: vec![kind.clone()],
            field_errors: Vec::new(),
        }
    }
}

/// Errors surfaced by `Session::fetch`
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("unknown asset kind '{kind}'")]
    UnknownKind { kind: AssetKind },

    /// Runtime backstop for cycles introduced by dynamic dependency lists
    #[error("dependency cycle detected: {}", join_kinds(members))]
    Cycle { members: Vec<AssetKind> },

    #[error("failed to generate '{kind}': {error}")]
    Generation { kind: AssetKind, error: GenerateError },

    #[error("failed to persist '{kind}': {error}")]
    Persistence {
        kind: AssetKind,
        error: StateStoreError,
    },

    #[error("cannot resolve '{kind}': {error}")]
    Dependency {
        kind: AssetKind,
        error: Box<ResolveError>,
    },

    #[error("{} assets failed:\n{}", .0.len(), join_errors(.0))]
    Aggregate(Vec<ResolveError>),

    #[error("'{kind}' already failed in this session: {}", failure.message)]
    PreviouslyFailed {
        kind: AssetKind,
        failure: Arc<RecordedFailure>,
    },

    #[error("resolution cancelled before generating '{kind}'")]
    Cancelled { kind: AssetKind },
}

impl ResolveError {
    /// Kinds where the failure originated (leaves of the wrapping chain)
    pub fn failing_kinds(&self) -> Vec<AssetKind> {
        let mut kinds = Vec::new();
        self.collect_failing(&mut kinds);
        kinds.sort();
        kinds.dedup();
        kinds
    }

    fn collect_failing(&self, out: &mut Vec<AssetKind>) {
        match self {
            ResolveError::UnknownKind { kind }
            | ResolveError::Generation { kind, .. }
            | ResolveError::Persistence { kind, .. }
            | ResolveError::Cancelled { kind } => out.push(kind.clone()),
            ResolveError::Cycle { members } => out.extend(members.iter().cloned()),
            ResolveError::Dependency { error, .. } => error.collect_failing(out),
            ResolveError::PreviouslyFailed { failure, .. } => {
                out.extend(failure.failing_kinds.iter().cloned())
            }
            ResolveError::Aggregate(errors) => {
                for error in errors {
                    error.collect_failing(out);
                }
            }
        }
    }

    /// All field-scoped validation errors found anywhere in the chain
    pub fn field_errors(&self) -> Vec<(AssetKind, FieldError)> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<(AssetKind, FieldError)>) {
        match self {
            ResolveError::Generation {
                kind,
                error: GenerateError::Validation(errors),
            } => out.extend(errors.iter().map(|e| (kind.clone(), e.clone()))),
            ResolveError::Dependency { error, .. } => error.collect_fields(out),
            ResolveError::PreviouslyFailed { failure, .. } => {
                out.extend(failure.field_errors.iter().cloned())
            }
            ResolveError::Aggregate(errors) => {
                for error in errors {
                    error.collect_fields(out);
                }
            }
            _ => {}
        }
    }

    /// Collapse a list of sibling failures into one error
    pub(crate) fn combine(mut errors: Vec<ResolveError>) -> Option<ResolveError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ResolveError::Aggregate(errors)),
        }
    }
}

/// Top-level error for use cases and the CLI
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error("state store error: {0}")]
    StateStore(#[from] StateStoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("state directory {path} is locked by another process: {error}")]
    Locked {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("unknown target '{name}' (expected one of: {expected})")]
    UnknownTarget { name: String, expected: String },
}
