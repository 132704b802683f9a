use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("could not read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("store registry validation failed: {0}")]
    Validation(String),
}
