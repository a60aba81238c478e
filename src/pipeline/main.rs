use crate::annotator::{annotate, AnnotatedImage, OverlayStyle};
use crate::config::Config;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_decoder::ImageSource;
use crate::library::logger::interface::Logger;
use crate::pipeline::core::{init, transition, Effect, Event, State};
use crate::pipeline::error::{PipelineError, PipelineFailure};
use crate::quality_label::QualityLabel;
use image::RgbImage;
use std::collections::VecDeque;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

pub struct PipelineOutput {
    pub original: Arc<RgbImage>,
    pub label: QualityLabel,
    pub annotated: AnnotatedImage,
}

impl std::fmt::Debug for PipelineOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOutput")
            .field("original", &self.original.dimensions())
            .field("label", &self.label)
            .field("annotated", &self.annotated.text)
            .finish()
    }
}

/// Decode, classify and annotate one image.
#[derive(Clone)]
pub struct Pipeline {
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    overlay: OverlayStyle,
    classify_timeout: Duration,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            image_classifier,
            overlay: config.overlay.clone(),
            classify_timeout: config.classify_timeout,
            logger: logger.with_namespace("pipeline"),
        }
    }

    pub fn run(&self, source: ImageSource) -> Result<PipelineOutput, PipelineFailure> {
        let (mut state, effects) = init(source);
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            let _ = self
                .logger
                .info(&format!("Running effect: {}", effect.to_display_string()));

            let event = self.execute_effect(effect);

            let _ = self.logger.info(&format!(
                "{} + {}",
                state.name(),
                event.to_display_string()
            ));

            let (new_state, effects) = transition(state, event);
            state = new_state;
            if state.is_terminal() {
                break;
            }
            pending.extend(effects);
        }

        match state {
            State::Annotated {
                original,
                label,
                annotated,
            } => Ok(PipelineOutput {
                original,
                label,
                annotated,
            }),
            State::Failed { original, error } => {
                let _ = self.logger.error(&error.to_string());
                Err(PipelineFailure { original, error })
            }
            other => Err(PipelineFailure {
                original: None,
                error: PipelineError::Stalled(other.name()),
            }),
        }
    }

    fn execute_effect(&self, effect: Effect) -> Event {
        match effect {
            Effect::Decode { source } => Event::DecodeDone(source.decode()),
            Effect::Classify { image } => Event::ClassifyDone(self.classify_with_timeout(image)),
            Effect::Annotate { image, label } => {
                Event::AnnotateDone(annotate(&image, &label, &self.overlay))
            }
        }
    }

    /// Runs the classifier on a worker thread and waits at most
    /// `classify_timeout`. A late result is dropped with the worker.
    fn classify_with_timeout(&self, image: Arc<RgbImage>) -> Result<QualityLabel, PipelineError> {
        let (tx, rx) = mpsc::channel();
        let image_classifier = Arc::clone(&self.image_classifier);

        std::thread::Builder::new()
            .name("classify".to_string())
            .spawn(move || {
                let _ = tx.send(image_classifier.classify(&image));
            })
            .map_err(|e| PipelineError::Classification(Box::new(e)))?;

        match rx.recv_timeout(self.classify_timeout) {
            Ok(Ok(label)) => Ok(label),
            Ok(Err(e)) => Err(PipelineError::Classification(e)),
            Err(RecvTimeoutError::Timeout) => {
                Err(PipelineError::ClassificationTimeout(self.classify_timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(PipelineError::Classification(
                "classifier stopped without producing a label".into(),
            )),
        }
    }
}
