use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use image::GrayImage;
use rusty_tesseract::{Args, Image};

use crate::chyron::error::ChyronError;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(0);

/// Characters the recognizer is restricted to.
pub const CHAR_WHITELIST: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.\n ";

/// OCR boundary. Implementations must accept any valid image and may return
/// an empty string; failures of the underlying engine surface as
/// [`ChyronError::Ocr`].
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage, char_whitelist: &str) -> Result<String, ChyronError>;
}

/// Recognizer backed by the external `tesseract` binary.
pub struct TesseractOcr {
    lang: String,
    psm: i32,
    oem: i32,
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self {
            lang: "eng".to_string(),
            // single uniform block, default engine
            psm: 6,
            oem: 3,
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &GrayImage, char_whitelist: &str) -> Result<String, ChyronError> {
        let args = Args {
            lang: self.lang.clone(),
            config_variables: HashMap::from([(
                "tessedit_char_whitelist".to_string(),
                char_whitelist.to_string(),
            )]),
            dpi: Some(150),
            psm: Some(self.psm),
            oem: Some(self.oem),
        };
        // tesseract runs on a file path, so the crop goes through a temp file
        let path = std::env::temp_dir().join(format!(
            "chyron_ocr_{}_{}.png",
            std::process::id(),
            NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst)
        ));
        image
            .save(&path)
            .map_err(|e| ChyronError::Ocr(e.to_string()))?;
        let text = Image::from_path(&path)
            .and_then(|tess_image| rusty_tesseract::image_to_string(&tess_image, &args))
            .map_err(|e| ChyronError::Ocr(e.to_string()));
        let _ = std::fs::remove_file(&path);
        text
    }
}

/// Scripted recognizer for tests: hands out queued responses, then the
/// fallback text once the queue is drained.
pub struct MockOcr {
    responses: Mutex<VecDeque<String>>,
    fallback: String,
    calls: AtomicUsize,
}

impl MockOcr {
    pub fn fixed(text: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            fallback: String::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for MockOcr {
    fn recognize(&self, _image: &GrayImage, _char_whitelist: &str) -> Result<String, ChyronError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        Ok(responses.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> GrayImage {
        GrayImage::new(4, 4)
    }

    #[test]
    fn test_mock_hands_out_responses_then_fallback() {
        let ocr = MockOcr::with_responses(vec!["first", "second"]);

        assert_eq!(ocr.recognize(&blank(), CHAR_WHITELIST).unwrap(), "first");
        assert_eq!(ocr.recognize(&blank(), CHAR_WHITELIST).unwrap(), "second");
        assert_eq!(ocr.recognize(&blank(), CHAR_WHITELIST).unwrap(), "");
        assert_eq!(ocr.call_count(), 3);
    }

    #[test]
    fn test_fixed_mock_repeats() {
        let ocr = MockOcr::fixed("Jim Lehrer");
        assert_eq!(ocr.recognize(&blank(), CHAR_WHITELIST).unwrap(), "Jim Lehrer");
        assert_eq!(ocr.recognize(&blank(), CHAR_WHITELIST).unwrap(), "Jim Lehrer");
    }

    #[test]
    fn test_whitelist_contents() {
        assert!(CHAR_WHITELIST.contains('a'));
        assert!(CHAR_WHITELIST.contains('Z'));
        assert!(CHAR_WHITELIST.contains('.'));
        assert!(CHAR_WHITELIST.contains('\n'));
        assert!(CHAR_WHITELIST.contains(' '));
        assert!(!CHAR_WHITELIST.contains('0'));
    }
}
