use crate::chyron::detector::TextBoxDetector;
use crate::chyron::error::ChyronError;
use crate::chyron::frame::Frame;
use crate::chyron::text_box::TextBox;

/// Row where the lower band begins, as a fraction of frame height.
pub(crate) const BOTTOM_REGION_START: f64 = 0.6;

/// Decides chyron presence for one frame from text-box coverage density.
///
/// The detector's boxes are rasterized into a coverage mask; the frame is
/// split at `0.6 * height`. Heavy coverage in the upper region (over half of
/// it) rejects the frame as a full-screen graphic. Otherwise the frame is
/// accepted when lower-region coverage exceeds `threshold`.
///
/// On acceptance this returns the detector's full box set, not only the
/// lower-region boxes that passed the density test. Callers rely on
/// [`filter_boxes`] to narrow the set to the chyron candidate.
///
/// [`filter_boxes`]: crate::chyron::box_filter::filter_boxes
pub fn evaluate(
    detector: &dyn TextBoxDetector,
    frame: &Frame,
    threshold: f64,
) -> Result<Option<Vec<TextBox>>, ChyronError> {
    let boxes = detector.detect(frame)?;
    if boxes.is_empty() {
        return Ok(None);
    }

    let width = frame.width;
    let height = frame.height;
    let split = (BOTTOM_REGION_START * f64::from(height)).floor() as u32;

    let top_area = covered_area(&boxes, width, 0, split);
    let top_total = f64::from(split) * f64::from(width);
    if top_total > 0.0 && top_area as f64 / top_total > 0.5 {
        return Ok(None);
    }

    let bottom_area = covered_area(&boxes, width, split, height);
    let bottom_total = f64::from(height - split) * f64::from(width);
    if bottom_total > 0.0 && bottom_area as f64 / bottom_total > threshold {
        return Ok(Some(boxes));
    }
    Ok(None)
}

/// Union coverage of `boxes` clipped to rows `[y_start, y_end)` and the
/// frame width, in pixels. Overlapping boxes are counted once.
fn covered_area(boxes: &[TextBox], width: u32, y_start: u32, y_end: u32) -> u64 {
    let mut area = 0u64;
    for y in y_start..y_end {
        let mut spans: Vec<(u32, u32)> = boxes
            .iter()
            .filter(|b| b.y_min <= y && y < b.y_max)
            .map(|b| (b.x_min.min(width), b.x_max.min(width)))
            .filter(|(x0, x1)| x0 < x1)
            .collect();
        spans.sort_unstable();

        let mut reach = 0u32;
        for (x0, x1) in spans {
            if x1 <= reach {
                continue;
            }
            area += u64::from(x1 - x0.max(reach));
            reach = x1;
        }
    }
    area
}
