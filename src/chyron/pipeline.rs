use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::chyron::box_filter::filter_boxes;
use crate::chyron::detector::TextBoxDetector;
use crate::chyron::error::ChyronError;
use crate::chyron::frame::Frame;
use crate::chyron::ocr::OcrEngine;
use crate::chyron::presence;
use crate::chyron::resolver::{ChyronResult, SegmentResolver};
use crate::chyron::source::FrameSource;
use crate::chyron::tracker::SegmentTracker;

/// Hard ceiling on scanned frames: five hours of 30 fps video. A safety
/// valve against runaway or corrupt inputs, not a tuning knob.
pub const MAX_SCAN_FRAMES: u64 = 30 * 60 * 60 * 5;

/// Unit used for segment boundaries in the output annotation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Frames,
    Milliseconds,
}

/// Scan parameters, validated before any frame is pulled.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Evaluate every Nth frame.
    pub sample_ratio: u64,
    /// Segments spanning this many frames or fewer are dropped.
    pub min_duration: u64,
    /// Lower-region coverage fraction required for chyron presence.
    pub threshold: f64,
    pub time_unit: TimeUnit,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_ratio: 5,
            min_duration: 10,
            threshold: 0.5,
            time_unit: TimeUnit::Frames,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), ChyronError> {
        if self.sample_ratio < 1 {
            return Err(ChyronError::InvalidParameter(
                "sample_ratio must be at least 1".to_string(),
            ));
        }
        if self.min_duration < 1 {
            return Err(ChyronError::InvalidParameter(
                "min_duration must be at least 1".to_string(),
            ));
        }
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ChyronError::InvalidParameter(format!(
                "threshold must lie in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ScanStats {
    frames_read: u64,
    frames_sampled: u64,
    segments_emitted: u64,
}

/// Scans a frame source for chyron segments and transcribes each one.
///
/// Frames are pulled one at a time; every `sample_ratio`-th frame goes
/// through the presence decision and box filter, and the tracker groups the
/// outcomes into segments. Each segment is resolved to text as soon as it
/// closes. Detector and OCR failures abort the scan.
pub fn detect_segments(
    source: &mut dyn FrameSource,
    detector: &dyn TextBoxDetector,
    ocr: &dyn OcrEngine,
    config: &DetectionConfig,
) -> Result<Vec<ChyronResult>, ChyronError> {
    config.validate()?;

    let resolver = SegmentResolver::new(ocr);
    let mut tracker = SegmentTracker::new(config.min_duration);
    let mut results = Vec::new();
    let mut stats = ScanStats::default();
    let mut counter: u64 = 0;
    let mut last_position: Option<(u64, f64)> = None;

    while let Some(frame) = source.next_frame()? {
        let frame_index = counter;
        let timestamp_ms = frame.timestamp_ms;
        last_position = Some((frame_index, timestamp_ms));
        stats.frames_read += 1;

        let mut boundary: Option<Frame> = None;
        if frame_index % config.sample_ratio == 0 {
            stats.frames_sampled += 1;
            let chyron_box = presence::evaluate(detector, &frame, config.threshold)?
                .and_then(|boxes| filter_boxes(&boxes, frame.height));
            match chyron_box {
                Some(b) => tracker.record_presence(frame_index, timestamp_ms, frame, b),
                None => {
                    if let Some(segment) = tracker.record_absence(frame_index, timestamp_ms) {
                        results.push(resolver.resolve(segment)?);
                        stats.segments_emitted += 1;
                    }
                    boundary = Some(frame);
                }
            }
        } else {
            boundary = Some(frame);
        }

        counter += 1;
        if counter > MAX_SCAN_FRAMES {
            warn!("frame ceiling hit after {counter} frames, stopping scan");
            if let Some(segment) = tracker.force_close(frame_index, timestamp_ms, boundary) {
                results.push(resolver.resolve(segment)?);
                stats.segments_emitted += 1;
            }
            log_stats(&stats, &tracker);
            return Ok(results);
        }
    }

    if let Some((frame_index, timestamp_ms)) = last_position {
        if let Some(segment) = tracker.finish(frame_index, timestamp_ms) {
            results.push(resolver.resolve(segment)?);
            stats.segments_emitted += 1;
        }
    }
    log_stats(&stats, &tracker);
    Ok(results)
}

fn log_stats(stats: &ScanStats, tracker: &SegmentTracker) {
    info!(
        "scan done: {} frames read, {} sampled, {} segments emitted, {} discarded",
        stats.frames_read,
        stats.frames_sampled,
        stats.segments_emitted,
        tracker.discarded_count()
    );
}

/// Detector, recognizer and parameters bundled behind one entry point.
pub struct ChyronDetector {
    detector: Box<dyn TextBoxDetector>,
    ocr: Box<dyn OcrEngine>,
    config: DetectionConfig,
}

impl ChyronDetector {
    pub fn new(
        detector: Box<dyn TextBoxDetector>,
        ocr: Box<dyn OcrEngine>,
        config: DetectionConfig,
    ) -> Result<Self, ChyronError> {
        config.validate()?;
        Ok(Self {
            detector,
            ocr,
            config,
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn detect_segments(
        &self,
        source: &mut dyn FrameSource,
    ) -> Result<Vec<ChyronResult>, ChyronError> {
        detect_segments(source, self.detector.as_ref(), self.ocr.as_ref(), &self.config)
    }
}
