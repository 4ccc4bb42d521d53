use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("container {width}x{height} cannot hold a ball")]
    DegenerateContainer { width: f32, height: f32 },
    #[error("invalid ball size range [{min}, {max}]")]
    InvalidSizeRange { min: f32, max: f32 },
    #[error("invalid blur length {0:?}")]
    InvalidLength(String),
    #[error("transfer interval must be greater than zero")]
    ZeroInterval,
    #[error("surface error: {0}")]
    Surface(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to parse TOML options: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read options: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn surface(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Surface(err)
    }
}
