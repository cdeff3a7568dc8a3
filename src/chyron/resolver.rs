use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::Serialize;

use crate::chyron::error::ChyronError;
use crate::chyron::ocr::{OcrEngine, CHAR_WHITELIST};
use crate::chyron::preprocess;
use crate::chyron::text_box::TextBox;
use crate::chyron::tracker::RawSegment;

const MAX_OCR_WORKERS: usize = 4;

/// OCR calls shell out to an external engine, so they run on their own
/// bounded pool instead of the global rayon one.
static OCR_POOL: Lazy<rayon::ThreadPool> = Lazy::new(|| {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get().min(MAX_OCR_WORKERS))
        .build()
        .expect("failed to build OCR worker pool")
});

/// Final transcription for one chyron segment.
#[derive(Debug, Clone, Serialize)]
pub struct ChyronResult {
    pub start_frame: u64,
    pub end_frame: u64,
    pub start_ms: f64,
    pub end_ms: f64,
    pub chyron_box: Option<TextBox>,
    pub text: String,
}

/// Turns a closed segment into a [`ChyronResult`].
///
/// Every collected frame is preprocessed and recognized independently; the
/// longest transcription wins. OCR quality shifts frame to frame with
/// motion and compression, and length is a cheap proxy for the most fully
/// recognized pass. It can also prefer a longer but noisier string; that
/// trade-off is accepted.
pub struct SegmentResolver<'a> {
    ocr: &'a dyn OcrEngine,
}

impl<'a> SegmentResolver<'a> {
    pub fn new(ocr: &'a dyn OcrEngine) -> Self {
        Self { ocr }
    }

    pub fn resolve(&self, segment: RawSegment) -> Result<ChyronResult, ChyronError> {
        let RawSegment {
            start_frame,
            end_frame,
            start_ms,
            end_ms,
            frames,
            representative_box,
        } = segment;

        let texts: Vec<String> = OCR_POOL.install(|| {
            frames
                .par_iter()
                .map(|frame| {
                    let image = preprocess::prepare(frame, representative_box.as_ref());
                    if image.width() == 0 || image.height() == 0 {
                        return Ok(String::new());
                    }
                    self.ocr.recognize(&image, CHAR_WHITELIST)
                })
                .collect::<Result<Vec<_>, ChyronError>>()
        })?;

        Ok(ChyronResult {
            start_frame,
            end_frame,
            start_ms,
            end_ms,
            chyron_box: representative_box,
            text: longest_text(texts),
        })
    }
}

/// Longest string by character count; equal lengths keep the earlier one.
fn longest_text(texts: Vec<String>) -> String {
    let mut best: Option<String> = None;
    for text in texts {
        let longer = match &best {
            Some(current) => text.chars().count() > current.chars().count(),
            None => true,
        };
        if longer {
            best = Some(text);
        }
    }
    best.unwrap_or_default()
}
