//! Detects lower-screen chyron overlays in video and transcribes them.
//!
//! A frame source is scanned at a configurable stride; an injected text-box
//! detector plus a coverage-density test decide chyron presence per sampled
//! frame, contiguous detections become time segments, and each segment is
//! resolved to text by an injected OCR engine.

pub mod api;
pub mod chyron;

pub use chyron::{
    detect_segments, ChyronDetector, ChyronError, ChyronResult, DetectionConfig, Frame,
    FrameSource, OcrEngine, TextBoxDetector, TimeUnit,
};

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}
