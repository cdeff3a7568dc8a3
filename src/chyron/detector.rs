use crate::chyron::error::ChyronError;
use crate::chyron::frame::Frame;
use crate::chyron::text_box::TextBox;

/// Text-region detector boundary. Implementations wrap an external model
/// (EAST or similar) and return axis-aligned boxes around text-like regions.
pub trait TextBoxDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<TextBox>, ChyronError>;
}

/// Scripted detector for tests: a closure maps frame index to boxes.
pub struct MockBoxDetector {
    pattern: Box<dyn Fn(u64) -> Vec<TextBox> + Send + Sync>,
}

impl MockBoxDetector {
    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(u64) -> Vec<TextBox> + Send + Sync + 'static,
    {
        Self {
            pattern: Box::new(pattern),
        }
    }

    /// Reports `chyron_box` on every frame index in `frames`, nothing elsewhere.
    pub fn with_box_at_frames(frames: Vec<u64>, chyron_box: TextBox) -> Self {
        Self::with_pattern(move |index| {
            if frames.contains(&index) {
                vec![chyron_box]
            } else {
                Vec::new()
            }
        })
    }

    pub fn silent() -> Self {
        Self::with_pattern(|_| Vec::new())
    }
}

impl TextBoxDetector for MockBoxDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<TextBox>, ChyronError> {
        Ok((self.pattern)(frame.index))
    }
}

/// Heuristic band proposer for lower-frame overlays.
///
/// Searches the bottom 40% of the frame for a horizontal run of rows with a
/// high share of bright pixels and reports it as a single box. Usable as a
/// default when no external text detector is wired in; real deployments
/// inject their own [`TextBoxDetector`].
pub struct LumaBandDetector {
    /// Luma value a pixel must exceed to count as bright.
    brightness_threshold: u8,
    /// Share of bright pixels a row needs to join a band.
    row_ratio: f32,
}

impl LumaBandDetector {
    pub fn new() -> Self {
        Self {
            brightness_threshold: 180,
            row_ratio: 0.15,
        }
    }
}

impl Default for LumaBandDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBoxDetector for LumaBandDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<TextBox>, ChyronError> {
        let w = frame.width as usize;
        let h = frame.height as usize;
        if w == 0 || h == 0 {
            return Ok(Vec::new());
        }
        let gray = frame.to_luma();
        let start_y = h * 6 / 10;

        // longest run of bright rows in the lower frame
        let mut run_start = 0usize;
        let mut run_len = 0usize;
        let mut best_start = 0usize;
        let mut best_len = 0usize;
        for y in start_y..h {
            let row = &gray[y * w..(y + 1) * w];
            let bright = row
                .iter()
                .filter(|&&p| p > self.brightness_threshold)
                .count();
            if bright as f32 / w as f32 > self.row_ratio {
                if run_len == 0 {
                    run_start = y;
                }
                run_len += 1;
            } else {
                if run_len > best_len {
                    best_len = run_len;
                    best_start = run_start;
                }
                run_len = 0;
            }
        }
        if run_len > best_len {
            best_len = run_len;
            best_start = run_start;
        }

        // band height plausibility: roughly 3-15% of frame height
        let min_height = ((h as f32 * 0.03) as usize).max(1);
        let max_height = (h as f32 * 0.15) as usize;
        if best_len < min_height || best_len > max_height {
            return Ok(Vec::new());
        }

        // x extent of bright pixels inside the band
        let mut x_min = w;
        let mut x_max = 0usize;
        for y in best_start..best_start + best_len {
            for x in 0..w {
                if gray[y * w + x] > self.brightness_threshold {
                    x_min = x_min.min(x);
                    x_max = x_max.max(x + 1);
                }
            }
        }
        if x_min >= x_max {
            return Ok(Vec::new());
        }

        Ok(vec![TextBox::new(
            x_min as u32,
            best_start as u32,
            x_max as u32,
            (best_start + best_len) as u32,
        )])
    }
}
