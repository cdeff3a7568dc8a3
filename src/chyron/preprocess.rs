use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::chyron::frame::Frame;
use crate::chyron::presence::BOTTOM_REGION_START;
use crate::chyron::text_box::TextBox;

/// Crops the lower OCR band (rows from `0.6 * height` down) as grayscale.
pub fn bottom_band(frame: &Frame) -> GrayImage {
    let y0 = (BOTTOM_REGION_START * f64::from(frame.height)).floor() as u32;
    let band_height = frame.height - y0;
    let luma = frame.to_luma();
    let offset = (y0 * frame.width) as usize;
    GrayImage::from_raw(frame.width, band_height, luma[offset..].to_vec())
        .expect("band buffer size mismatch")
}

/// Fixed transform applied before recognition: invert, then half-scale.
/// Chyron text is usually light on dark; tesseract prefers the opposite.
pub fn normalize(band: &GrayImage) -> GrayImage {
    if band.width() == 0 || band.height() == 0 {
        return band.clone();
    }
    let mut inverted = band.clone();
    imageops::invert(&mut inverted);
    imageops::resize(
        &inverted,
        (inverted.width() / 2).max(1),
        (inverted.height() / 2).max(1),
        FilterType::Triangle,
    )
}

/// Narrows a normalized band image to the representative box.
///
/// The box arrives in full-frame coordinates; it is shifted into the band,
/// halved to match the resize, and clamped. A box that misses the band
/// leaves the image untouched.
pub fn crop_to_box(image: &GrayImage, chyron_box: &TextBox, frame_height: u32) -> GrayImage {
    let y0 = (BOTTOM_REGION_START * f64::from(frame_height)).floor() as u32;
    let x_min = chyron_box.x_min / 2;
    let y_min = chyron_box.y_min.saturating_sub(y0) / 2;
    let x_max = ((chyron_box.x_max + 1) / 2).min(image.width());
    let y_max = ((chyron_box.y_max.saturating_sub(y0) + 1) / 2).min(image.height());
    if x_min >= x_max || y_min >= y_max {
        return image.clone();
    }
    imageops::crop_imm(image, x_min, y_min, x_max - x_min, y_max - y_min).to_image()
}

/// Full preprocessing chain for one collected frame.
pub fn prepare(frame: &Frame, chyron_box: Option<&TextBox>) -> GrayImage {
    let normalized = normalize(&bottom_band(frame));
    match chyron_box {
        Some(b) => crop_to_box(&normalized, b, frame.height),
        None => normalized,
    }
}
