//! Thin packaging layer over the scan results.

pub mod annotation;
pub mod metadata;

pub use annotation::{
    assemble, AlignmentAnnotation, AnnotationDocument, TextDocumentAnnotation,
    TimeFrameAnnotation,
};
pub use metadata::{app_metadata, AppMetadata, ParameterSpec};
