// Error taxonomy shared by every command. Handlers return `CliError` so the
// binary can tell a bad invocation apart from a server rejection and pick
// a matching exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum CliError {
    /// No API key configured. Nothing runs unauthenticated.
    #[error("no API key configured: set OPENRELIK_API_KEY or pass --api-key")]
    MissingCredential,

    /// Required selector absent or conflicting selectors supplied.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A spec file that is not valid JSON.
    #[error("{} is not valid JSON: {source}", .path.display())]
    InvalidSpec {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("server rejected the request ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The server answered 2xx but the body did not have the expected shape.
    #[error("unexpected response from server: {0}")]
    Decode(String),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}: {source}", describe_path(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "i/o error".into(),
    }
}

impl CliError {
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        CliError::InvalidArguments(msg.into())
    }

    /// Wrap an I/O error that has no file attached (stdout, terminal).
    pub fn io(source: std::io::Error) -> Self {
        CliError::Io { path: None, source }
    }

    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } => 1,
            CliError::InvalidArguments(_) => 2,
            CliError::MissingCredential => 3,
            CliError::InvalidSpec { .. } => 4,
            CliError::NotFound(_) => 5,
            CliError::Upstream { .. } | CliError::Decode(_) => 6,
            CliError::Transport(_) => 7,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        CliError::io(source)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
