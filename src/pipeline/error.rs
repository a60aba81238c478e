use crate::annotator::RenderError;
use crate::image_decoder::DecodeError;
use image::RgbImage;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not decode image: {0}")]
    Decode(#[from] DecodeError),
    #[error("classification failed: {0}")]
    Classification(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("classification timed out after {0:?}")]
    ClassificationTimeout(Duration),
    #[error("could not draw prediction: {0}")]
    Render(#[from] RenderError),
    #[error("pipeline stopped in state {0}")]
    Stalled(&'static str),
}

/// A run that did not reach the annotated state. Keeps the decoded image, if
/// there was one, so it can still be shown.
#[derive(Error)]
#[error("{error}")]
pub struct PipelineFailure {
    pub original: Option<Arc<RgbImage>>,
    #[source]
    pub error: PipelineError,
}

impl std::fmt::Debug for PipelineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineFailure")
            .field("original", &self.original.as_ref().map(|i| i.dimensions()))
            .field("error", &self.error)
            .finish()
    }
}
