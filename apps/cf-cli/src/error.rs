use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to read cycle file: {path}")]
    CycleFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid cycle file: {0}")]
    CycleFile(#[from] serde_yaml::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Station error: {0}")]
    Flow(#[from] cf_flow::FlowError),

    #[error("Component error: {0}")]
    Component(#[from] cf_components::ComponentError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for cf-cli operations.
pub type AppResult<T> = Result<T, AppError>;
