use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChyronError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("text detector failed: {0}")]
    Detector(String),
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("frame source failed: {0}")]
    FrameSource(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
