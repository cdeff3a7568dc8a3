//! Chyron segment detection over sampled video frames.
//!
//! Core flow:
//! 1. Presence decision - text-box coverage density over the lower frame
//! 2. Box filter - single best lower-screen box per sampled frame
//! 3. Segment tracker - groups contiguous detections into time segments
//! 4. Segment resolver - OCR over collected frames, longest transcription wins

pub mod box_filter;
pub mod detector;
pub mod error;
pub mod frame;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod presence;
pub mod resolver;
pub mod source;
pub mod text_box;
pub mod tracker;

pub use box_filter::filter_boxes;
pub use detector::{LumaBandDetector, MockBoxDetector, TextBoxDetector};
pub use error::ChyronError;
pub use frame::Frame;
pub use ocr::{MockOcr, OcrEngine, TesseractOcr, CHAR_WHITELIST};
pub use pipeline::{
    detect_segments, ChyronDetector, DetectionConfig, TimeUnit, MAX_SCAN_FRAMES,
};
pub use resolver::{ChyronResult, SegmentResolver};
pub use source::{FrameSource, ImageDirSource, VecFrameSource};
pub use text_box::TextBox;
pub use tracker::{RawSegment, SegmentTracker};
