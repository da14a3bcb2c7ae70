use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuickFindError>;

#[derive(Debug, Error)]
pub enum QuickFindError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Glob(#[from] globset::Error),
}

impl QuickFindError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Glob(_) => "GLOB_ERROR",
        }
    }
}
