use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    /// Missing or out-of-range user input, caught before any remote call.
    #[error("{0}")]
    ValidationError(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Transient failures that outlived every retry.
    #[error("Dịch vụ AI hiện đang quá tải. Vui lòng thử lại sau giây lát. (Service Unavailable 503)")]
    ServiceOverloaded,

    #[error("Không thể tạo kịch bản.")]
    EmptyScript,

    #[error("Tạo ảnh cho cảnh {scene} thất bại.")]
    ImageGenerationError { scene: u32 },

    #[error("Humanized script changed shape: expected {expected} scenes, got {actual}")]
    ScriptShapeChanged { expected: usize, actual: usize },

    #[error("No work-in-progress item")]
    NoWorkInProgress,

    #[error("Scene index {index} out of range (item has {len} scenes)")]
    SceneOutOfRange { index: usize, len: usize },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("Base64 decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Settings store error: {0}")]
    SettingsError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

impl StudioError {
    /// Service-unavailable class failures, eligible for automatic retry.
    pub fn is_transient(&self) -> bool {
        match self {
            StudioError::ApiError { status, message } => {
                *status == 503
                    || message.contains("503")
                    || message.to_lowercase().contains("unavailable")
            }
            _ => false,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StudioError::ValidationError(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
