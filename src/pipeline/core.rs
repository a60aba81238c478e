use crate::annotator::{AnnotatedImage, RenderError};
use crate::image_decoder::{DecodeError, ImageSource};
use crate::pipeline::error::PipelineError;
use crate::quality_label::QualityLabel;
use image::RgbImage;
use std::sync::Arc;

pub enum State {
    Decoding,
    Decoded {
        original: Arc<RgbImage>,
    },
    Classified {
        original: Arc<RgbImage>,
        label: QualityLabel,
    },
    Annotated {
        original: Arc<RgbImage>,
        label: QualityLabel,
        annotated: AnnotatedImage,
    },
    Failed {
        original: Option<Arc<RgbImage>>,
        error: PipelineError,
    },
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Decoding => "Decoding",
            State::Decoded { .. } => "Decoded",
            State::Classified { .. } => "Classified",
            State::Annotated { .. } => "Annotated",
            State::Failed { .. } => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Annotated { .. } | State::Failed { .. })
    }
}

#[derive(Debug)]
pub enum Event {
    DecodeDone(Result<RgbImage, DecodeError>),
    ClassifyDone(Result<QualityLabel, PipelineError>),
    AnnotateDone(Result<AnnotatedImage, RenderError>),
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::DecodeDone(Ok(image)) => {
                format!("DecodeDone(Ok({}x{}))", image.width(), image.height())
            }
            Event::DecodeDone(Err(e)) => format!("DecodeDone(Err({}))", e),
            Event::ClassifyDone(Ok(label)) => format!("ClassifyDone(Ok({}))", label),
            Event::ClassifyDone(Err(e)) => format!("ClassifyDone(Err({}))", e),
            Event::AnnotateDone(Ok(annotated)) => {
                format!("AnnotateDone(Ok({:?}))", annotated.text)
            }
            Event::AnnotateDone(Err(e)) => format!("AnnotateDone(Err({}))", e),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Effect {
    Decode {
        source: ImageSource,
    },
    Classify {
        image: Arc<RgbImage>,
    },
    Annotate {
        image: Arc<RgbImage>,
        label: QualityLabel,
    },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Decode { source } => format!("Decode {{ source: {} }}", source.describe()),
            Effect::Classify { image } => {
                format!("Classify {{ image: {}x{} }}", image.width(), image.height())
            }
            Effect::Annotate { image, label } => format!(
                "Annotate {{ image: {}x{}, label: {} }}",
                image.width(),
                image.height(),
                label
            ),
        }
    }
}

pub fn init(source: ImageSource) -> (State, Vec<Effect>) {
    (State::Decoding, vec![Effect::Decode { source }])
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match (state, event) {
        (State::Decoding, Event::DecodeDone(Ok(image))) => {
            let original = Arc::new(image);
            (
                State::Decoded {
                    original: original.clone(),
                },
                vec![Effect::Classify { image: original }],
            )
        }

        (State::Decoding, Event::DecodeDone(Err(e))) => (
            State::Failed {
                original: None,
                error: PipelineError::Decode(e),
            },
            vec![],
        ),

        (State::Decoded { original }, Event::ClassifyDone(Ok(label))) => (
            State::Classified {
                original: original.clone(),
                label: label.clone(),
            },
            vec![Effect::Annotate {
                image: original,
                label,
            }],
        ),

        (State::Decoded { original }, Event::ClassifyDone(Err(error))) => (
            State::Failed {
                original: Some(original),
                error,
            },
            vec![],
        ),

        (State::Classified { original, label }, Event::AnnotateDone(Ok(annotated))) => (
            State::Annotated {
                original,
                label,
                annotated,
            },
            vec![],
        ),

        (State::Classified { original, .. }, Event::AnnotateDone(Err(e))) => (
            State::Failed {
                original: Some(original),
                error: PipelineError::Render(e),
            },
            vec![],
        ),

        (state, _) => (state, vec![]),
    }
}
