use std::path::{Path, PathBuf};

use crate::chyron::error::ChyronError;
use crate::chyron::frame::Frame;

/// Sequential pull interface over decoded video frames.
///
/// Implementations hand out frames in stream order with indices starting at
/// zero. Decoding itself lives behind this boundary; the scanner only pulls.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, ChyronError>;
}

/// In-memory source over pre-decoded frames.
pub struct VecFrameSource {
    frames: std::vec::IntoIter<Frame>,
}

impl VecFrameSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for VecFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, ChyronError> {
        Ok(self.frames.next())
    }
}

/// Walks a directory of still frames in file-name order, synthesizing
/// timestamps from a fixed frame rate. Covers workflows where the video was
/// already exploded into images by an external decoder.
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next_index: u64,
    frame_interval_ms: f64,
}

impl ImageDirSource {
    pub fn open(dir: impl AsRef<Path>, fps: f64) -> Result<Self, ChyronError> {
        if !(fps > 0.0) || !fps.is_finite() {
            return Err(ChyronError::InvalidParameter(format!(
                "fps must be positive, got {fps}"
            )));
        }
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.to_ascii_lowercase())
                        .as_deref(),
                    Some("png" | "jpg" | "jpeg" | "bmp")
                )
            })
            .collect();
        paths.sort();
        Ok(Self {
            paths,
            next_index: 0,
            frame_interval_ms: 1000.0 / fps,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, ChyronError> {
        let Some(path) = self.paths.get(self.next_index as usize) else {
            return Ok(None);
        };
        let image = image::open(path)
            .map_err(|e| ChyronError::FrameSource(format!("{}: {e}", path.display())))?
            .to_rgba8();
        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(Frame::new(
            image.width(),
            image.height(),
            image.into_raw(),
            index as f64 * self.frame_interval_ms,
            index,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source_drains_in_order() {
        let frames = vec![
            Frame::new(2, 2, vec![0; 16], 0.0, 0),
            Frame::new(2, 2, vec![0; 16], 33.0, 1),
        ];
        let mut source = VecFrameSource::new(frames);

        assert_eq!(source.next_frame().unwrap().unwrap().index, 0);
        assert_eq!(source.next_frame().unwrap().unwrap().index, 1);
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_image_dir_source_rejects_bad_fps() {
        assert!(matches!(
            ImageDirSource::open(std::env::temp_dir(), 0.0),
            Err(ChyronError::InvalidParameter(_))
        ));
        assert!(matches!(
            ImageDirSource::open(std::env::temp_dir(), -5.0),
            Err(ChyronError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_image_dir_source_reads_sorted_frames() {
        let dir = std::env::temp_dir().join(format!("chyron_detect_src_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let dark = image::GrayImage::from_pixel(4, 4, image::Luma([10]));
        let light = image::GrayImage::from_pixel(4, 4, image::Luma([200]));
        light.save(dir.join("frame_000.png")).unwrap();
        dark.save(dir.join("frame_001.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut source = ImageDirSource::open(&dir, 25.0).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.timestamp_ms, 0.0);
        assert_eq!(first.data[0], 200);

        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.timestamp_ms, 40.0);
        assert_eq!(second.data[0], 10);

        assert!(source.next_frame().unwrap().is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
