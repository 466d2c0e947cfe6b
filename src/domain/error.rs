use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for era operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Required environment variable is not set.
    #[error("Environment variable '{0}' is not set")]
    EnvironmentVariableMissing(String),

    /// The directory under which dated folders are created does not exist.
    #[error("Base directory {} does not exist.", .0.display())]
    MissingBaseDirectory(PathBuf),

    /// The dated folder already exists and `exist_ok` was not set.
    #[error("Directory {} already exists", .0.display())]
    DirectoryExists(PathBuf),

    /// strftime template contains a specifier chrono cannot render.
    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),

    /// Folder name pattern is not a valid regular expression.
    #[error("Invalid folder pattern '{pattern}': {details}")]
    InvalidFolderPattern { pattern: String, details: String },

    /// Column is not present in the tabular data.
    #[error("Column `{0}` not in dataframe")]
    MissingColumn(String),

    /// Column holds no usable numeric values.
    #[error("Column `{0}` has no numeric values to classify")]
    EmptyColumn(String),

    /// Requested number of stops is unusable.
    #[error("Stop count must be at least 1, got {0}")]
    InvalidStopCount(usize),

    /// No operational layer carries the requested title.
    #[error("Could not find \"{title}\" in the web map's operational layers")]
    LayerNotFound { title: String },

    /// Layer exists but its renderer does not have the unclassed ramp shape.
    #[error("Layer \"{layer}\" renderer is missing `{missing}`")]
    RendererShapeMismatch { layer: String, missing: String },

    /// Remote folder to transfer from does not exist.
    #[error("Folder `{}` not found on transfer source", .0.display())]
    RemoteFolderNotFound(PathBuf),

    /// Mapping portal request failed.
    #[error("{message}")]
    PortalApiError { message: String, status: Option<u16> },

    /// Feature service rejected a value whose type does not fit the field.
    #[error("Field type mismatch between dataframe and feature service: {0}")]
    FieldTypeMismatch(String),

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub(crate) fn portal<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::PortalApiError { message: message.into(), status }
    }

    /// Provide an `io::ErrorKind`-like view for callers that only need the category.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidDateFormat(_)
            | AppError::InvalidFolderPattern { .. }
            | AppError::EmptyColumn(_)
            | AppError::InvalidStopCount(_)
            | AppError::RendererShapeMismatch { .. }
            | AppError::FieldTypeMismatch(_)
            | AppError::ParseError { .. }
            | AppError::TomlParseError(_) => io::ErrorKind::InvalidInput,
            AppError::EnvironmentVariableMissing(_)
            | AppError::MissingBaseDirectory(_)
            | AppError::MissingColumn(_)
            | AppError::LayerNotFound { .. }
            | AppError::RemoteFolderNotFound(_) => io::ErrorKind::NotFound,
            AppError::DirectoryExists(_) => io::ErrorKind::AlreadyExists,
            AppError::PortalApiError { .. } => io::ErrorKind::Other,
        }
    }
}
