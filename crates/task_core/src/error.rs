use std::path::{Path, PathBuf};
use thiserror::Error;

/// Process exit codes the CLI uses for each error kind.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_INPUT: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const STORAGE: i32 = 3;
    pub const SERVICE: i32 = 4;
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("{}: {}", .path.display(), describe_malformed(.index, .field, .reason))]
    MalformedRecord {
        path: PathBuf,
        index: Option<usize>,
        field: Option<String>,
        reason: String,
    },

    #[error("{}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no {kind} ids left: the store already holds id {max}")]
    IdsExhausted { kind: &'static str, max: u64 },

    #[error("system clock: {0}")]
    Clock(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Failures of the external text generator. Callers treat these as
/// non-fatal to the task or note operation they accompany.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("text generator is not configured")]
    NotConfigured,

    #[error("text generator failed: {0}")]
    Failed(String),

    #[error("text generator returned no text")]
    EmptyResponse,
}

impl AppError {
    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(kind: &'static str, id: u64) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn storage(path: &Path, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.to_path_buf(),
            source,
        }
    }

    /// A document-level parse failure (not valid JSON, not an array).
    pub fn malformed_document<M: Into<String>>(path: &Path, reason: M) -> Self {
        Self::MalformedRecord {
            path: path.to_path_buf(),
            index: None,
            field: None,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_input",
            Self::NotFound { .. } => "not_found",
            Self::MalformedRecord { .. } => "invalid_data",
            Self::Storage { .. } => "io_error",
            Self::IdsExhausted { .. } => "ids_exhausted",
            Self::Clock(_) => "clock_error",
            Self::Service(_) => "service_error",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => exit_codes::INVALID_INPUT,
            Self::NotFound { .. } => exit_codes::NOT_FOUND,
            Self::MalformedRecord { .. }
            | Self::Storage { .. }
            | Self::IdsExhausted { .. }
            | Self::Clock(_) => exit_codes::STORAGE,
            Self::Service(_) => exit_codes::SERVICE,
        }
    }
}

fn describe_malformed(index: &Option<usize>, field: &Option<String>, reason: &str) -> String {
    match (index, field) {
        (Some(index), Some(field)) => format!("record {index}: field `{field}`: {reason}"),
        (Some(index), None) => format!("record {index}: {reason}"),
        (None, Some(field)) => format!("field `{field}`: {reason}"),
        (None, None) => reason.to_string(),
    }
}
