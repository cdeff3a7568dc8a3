use log::debug;

use crate::chyron::frame::Frame;
use crate::chyron::text_box::TextBox;

/// A closed chyron segment, ready for transcription.
///
/// `frames` holds every sampled frame on which a chyron box was found while
/// the segment was open, in stream order, and is never empty.
#[derive(Debug)]
pub struct RawSegment {
    pub start_frame: u64,
    pub end_frame: u64,
    pub start_ms: f64,
    pub end_ms: f64,
    pub frames: Vec<Frame>,
    pub representative_box: Option<TextBox>,
}

#[derive(Debug)]
struct OpenSegment {
    start_frame: u64,
    start_ms: f64,
    frames: Vec<Frame>,
    representative_box: Option<TextBox>,
}

#[derive(Debug)]
enum TrackerState {
    Outside,
    Inside(OpenSegment),
}

/// Two-state scanner that groups per-frame detections into segments.
///
/// `Outside` until a sampled frame carries a chyron box, `Inside` while
/// detections continue, back to `Outside` on the first sampled frame
/// without one. Closed segments spanning `min_duration` frames or fewer are
/// discarded rather than emitted. The frame span is measured on the raw
/// frame counter, so wall-clock length depends on the sample stride and
/// frame rate of the input.
pub struct SegmentTracker {
    state: TrackerState,
    min_duration: u64,
    discarded: u64,
}

impl SegmentTracker {
    pub fn new(min_duration: u64) -> Self {
        Self {
            state: TrackerState::Outside,
            min_duration,
            discarded: 0,
        }
    }

    pub fn is_inside(&self) -> bool {
        matches!(self.state, TrackerState::Inside(_))
    }

    /// Segments dropped so far for falling at or under `min_duration`.
    pub fn discarded_count(&self) -> u64 {
        self.discarded
    }

    /// Sampled frame with a chyron box: open a segment or extend the current
    /// one. The frame joins the segment buffer and its box becomes the
    /// representative box.
    pub fn record_presence(
        &mut self,
        counter: u64,
        timestamp_ms: f64,
        frame: Frame,
        chyron_box: TextBox,
    ) {
        match &mut self.state {
            TrackerState::Outside => {
                debug!("segment opened at frame {counter}");
                self.state = TrackerState::Inside(OpenSegment {
                    start_frame: counter,
                    start_ms: timestamp_ms,
                    frames: vec![frame],
                    representative_box: Some(chyron_box),
                });
            }
            TrackerState::Inside(open) => {
                open.frames.push(frame);
                open.representative_box = Some(chyron_box);
            }
        }
    }

    /// Sampled frame without a chyron box: close the open segment, if any.
    pub fn record_absence(&mut self, counter: u64, timestamp_ms: f64) -> Option<RawSegment> {
        self.close(counter, timestamp_ms, None)
    }

    /// Close at end of stream using the last pulled frame's position.
    pub fn finish(&mut self, counter: u64, timestamp_ms: f64) -> Option<RawSegment> {
        self.close(counter, timestamp_ms, None)
    }

    /// Forced close at the scan ceiling. `boundary` carries the current
    /// frame when it is not already in the segment buffer, so it is appended
    /// exactly once.
    pub fn force_close(
        &mut self,
        counter: u64,
        timestamp_ms: f64,
        boundary: Option<Frame>,
    ) -> Option<RawSegment> {
        self.close(counter, timestamp_ms, boundary)
    }

    fn close(
        &mut self,
        end_frame: u64,
        end_ms: f64,
        boundary: Option<Frame>,
    ) -> Option<RawSegment> {
        match std::mem::replace(&mut self.state, TrackerState::Outside) {
            TrackerState::Outside => None,
            TrackerState::Inside(mut open) => {
                if let Some(frame) = boundary {
                    open.frames.push(frame);
                }
                if end_frame - open.start_frame > self.min_duration {
                    debug!(
                        "segment closed: frames {}..{} ({} collected)",
                        open.start_frame,
                        end_frame,
                        open.frames.len()
                    );
                    Some(RawSegment {
                        start_frame: open.start_frame,
                        end_frame,
                        start_ms: open.start_ms,
                        end_ms,
                        frames: open.frames,
                        representative_box: open.representative_box,
                    })
                } else {
                    debug!(
                        "segment discarded: frames {}..{} under minimum span",
                        open.start_frame, end_frame
                    );
                    self.discarded += 1;
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame(index: u64) -> Frame {
        Frame::new(4, 4, vec![0; 4 * 4 * 4], index as f64 * 33.0, index)
    }

    fn test_box(y_min: u32) -> TextBox {
        TextBox::new(0, y_min, 4, y_min + 1)
    }

    #[test]
    fn test_absence_while_outside_is_noop() {
        let mut tracker = SegmentTracker::new(1);
        assert!(tracker.record_absence(5, 165.0).is_none());
        assert!(!tracker.is_inside());
    }

    #[test]
    fn test_open_extend_close() {
        let mut tracker = SegmentTracker::new(2);

        tracker.record_presence(10, 330.0, test_frame(10), test_box(70));
        assert!(tracker.is_inside());
        tracker.record_presence(11, 363.0, test_frame(11), test_box(71));
        tracker.record_presence(12, 396.0, test_frame(12), test_box(72));

        let segment = tracker.record_absence(13, 429.0).unwrap();
        assert!(!tracker.is_inside());
        assert_eq!(segment.start_frame, 10);
        assert_eq!(segment.end_frame, 13);
        assert_eq!(segment.start_ms, 330.0);
        assert_eq!(segment.end_ms, 429.0);
        assert_eq!(segment.frames.len(), 3);
        assert_eq!(segment.frames[0].index, 10);
        assert_eq!(segment.frames[2].index, 12);
        // representative box follows the latest detection
        assert_eq!(segment.representative_box, Some(test_box(72)));
    }

    #[test]
    fn test_minimum_span_is_strict() {
        // span equal to min_duration is discarded
        let mut tracker = SegmentTracker::new(5);
        tracker.record_presence(10, 0.0, test_frame(10), test_box(70));
        assert!(tracker.record_absence(15, 0.0).is_none());
        assert_eq!(tracker.discarded_count(), 1);

        // one frame longer is emitted
        tracker.record_presence(20, 0.0, test_frame(20), test_box(70));
        let segment = tracker.record_absence(26, 0.0).unwrap();
        assert_eq!(segment.end_frame - segment.start_frame, 6);
        assert_eq!(tracker.discarded_count(), 1);
    }

    #[test]
    fn test_finish_closes_open_segment() {
        let mut tracker = SegmentTracker::new(1);
        tracker.record_presence(10, 330.0, test_frame(10), test_box(70));
        tracker.record_presence(15, 495.0, test_frame(15), test_box(70));

        let segment = tracker.finish(15, 495.0).unwrap();
        assert_eq!(segment.start_frame, 10);
        assert_eq!(segment.end_frame, 15);
        assert_eq!(segment.end_ms, 495.0);
        assert_eq!(segment.frames.len(), 2);
    }

    #[test]
    fn test_finish_while_outside_is_noop() {
        let mut tracker = SegmentTracker::new(1);
        assert!(tracker.finish(99, 0.0).is_none());
    }

    #[test]
    fn test_force_close_appends_boundary_once() {
        let mut tracker = SegmentTracker::new(1);
        tracker.record_presence(10, 330.0, test_frame(10), test_box(70));

        let segment = tracker
            .force_close(14, 462.0, Some(test_frame(14)))
            .unwrap();
        assert_eq!(segment.frames.len(), 2);
        assert_eq!(segment.frames[1].index, 14);
        assert_eq!(segment.end_frame, 14);
    }

    #[test]
    fn test_force_close_without_boundary() {
        let mut tracker = SegmentTracker::new(1);
        tracker.record_presence(10, 330.0, test_frame(10), test_box(70));

        let segment = tracker.force_close(12, 396.0, None).unwrap();
        assert_eq!(segment.frames.len(), 1);
    }

    #[test]
    fn test_reopens_after_close() {
        let mut tracker = SegmentTracker::new(1);
        tracker.record_presence(10, 0.0, test_frame(10), test_box(70));
        tracker.record_absence(20, 0.0).unwrap();

        tracker.record_presence(30, 0.0, test_frame(30), test_box(70));
        assert!(tracker.is_inside());
        let segment = tracker.record_absence(40, 0.0).unwrap();
        assert_eq!(segment.start_frame, 30);
        assert_eq!(segment.frames.len(), 1);
    }
}
