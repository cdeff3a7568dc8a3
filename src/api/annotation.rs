//! Packages chyron results into the output annotation document.

use serde::Serialize;

use crate::chyron::error::ChyronError;
use crate::chyron::pipeline::TimeUnit;
use crate::chyron::resolver::ChyronResult;

/// Time span flagged as a chyron.
#[derive(Debug, Clone, Serialize)]
pub struct TimeFrameAnnotation {
    pub id: String,
    pub frame_type: String,
    pub start: f64,
    pub end: f64,
}

/// Transcription attached to one time frame.
#[derive(Debug, Clone, Serialize)]
pub struct TextDocumentAnnotation {
    pub id: String,
    pub text: String,
}

/// Links a time frame to its transcription.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentAnnotation {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotationDocument {
    pub time_unit: TimeUnit,
    pub time_frames: Vec<TimeFrameAnnotation>,
    pub text_documents: Vec<TextDocumentAnnotation>,
    pub alignments: Vec<AlignmentAnnotation>,
}

impl AnnotationDocument {
    pub fn to_json(&self) -> Result<String, ChyronError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds the annotation document for a finished scan.
pub fn assemble(results: &[ChyronResult], time_unit: TimeUnit) -> AnnotationDocument {
    let mut document = AnnotationDocument {
        time_unit,
        time_frames: Vec::with_capacity(results.len()),
        text_documents: Vec::with_capacity(results.len()),
        alignments: Vec::with_capacity(results.len()),
    };

    for (i, result) in results.iter().enumerate() {
        let n = i + 1;
        let (start, end) = match time_unit {
            TimeUnit::Frames => (result.start_frame as f64, result.end_frame as f64),
            TimeUnit::Milliseconds => (result.start_ms, result.end_ms),
        };
        document.time_frames.push(TimeFrameAnnotation {
            id: format!("tf_{n}"),
            frame_type: "chyron".to_string(),
            start,
            end,
        });
        document.text_documents.push(TextDocumentAnnotation {
            id: format!("td_{n}"),
            text: result.text.clone(),
        });
        document.alignments.push(AlignmentAnnotation {
            id: format!("al_{n}"),
            source: format!("tf_{n}"),
            target: format!("td_{n}"),
        });
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(start_frame: u64, end_frame: u64, text: &str) -> ChyronResult {
        ChyronResult {
            start_frame,
            end_frame,
            start_ms: start_frame as f64 * 33.0,
            end_ms: end_frame as f64 * 33.0,
            chyron_box: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_assemble_in_frames() {
        let results = vec![result(10, 25, "first"), result(40, 80, "second")];
        let document = assemble(&results, TimeUnit::Frames);

        assert_eq!(document.time_frames.len(), 2);
        assert_eq!(document.time_frames[0].start, 10.0);
        assert_eq!(document.time_frames[0].end, 25.0);
        assert_eq!(document.time_frames[0].frame_type, "chyron");
        assert_eq!(document.text_documents[1].text, "second");
        assert_eq!(document.alignments[1].source, "tf_2");
        assert_eq!(document.alignments[1].target, "td_2");
    }

    #[test]
    fn test_assemble_in_milliseconds() {
        let document = assemble(&[result(10, 25, "first")], TimeUnit::Milliseconds);
        assert_eq!(document.time_frames[0].start, 330.0);
        assert_eq!(document.time_frames[0].end, 825.0);
    }

    #[test]
    fn test_document_serializes() {
        let json = assemble(&[result(10, 25, "headline")], TimeUnit::Frames)
            .to_json()
            .unwrap();
        assert!(json.contains("\"frame_type\": \"chyron\""));
        assert!(json.contains("\"time_unit\": \"frames\""));
        assert!(json.contains("headline"));
    }

    #[test]
    fn test_empty_scan_yields_empty_document() {
        let document = assemble(&[], TimeUnit::Frames);
        assert!(document.time_frames.is_empty());
        assert!(document.alignments.is_empty());
    }
}
