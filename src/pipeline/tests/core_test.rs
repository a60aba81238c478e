#[cfg(test)]
mod core_test {
    use crate::annotator::{annotate, OverlayStyle, RenderError};
    use crate::image_decoder::{DecodeError, ImageSource};
    use crate::pipeline::core::{init, transition, Effect, Event, State};
    use crate::pipeline::error::PipelineError;
    use crate::quality_label::QualityLabel;
    use image::RgbImage;

    fn source() -> ImageSource {
        ImageSource::Upload {
            file_name: "road.png".to_string(),
            bytes: vec![],
        }
    }

    fn decoded() -> (State, Vec<Effect>) {
        let (state, _) = init(source());
        transition(state, Event::DecodeDone(Ok(RgbImage::new(8, 6))))
    }

    fn classified() -> (State, Vec<Effect>) {
        let (state, _) = decoded();
        transition(state, Event::ClassifyDone(Ok(QualityLabel::new("bad"))))
    }

    #[test]
    fn test_init() {
        let (state, effects) = init(source());

        assert!(matches!(state, State::Decoding));
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::Decode { .. }));
    }

    #[test]
    fn test_decode_success_requests_classify() {
        let (state, effects) = decoded();

        match &state {
            State::Decoded { original } => assert_eq!(original.dimensions(), (8, 6)),
            other => panic!("Unexpected state {}", other.name()),
        }
        match effects.as_slice() {
            [Effect::Classify { image }] => assert_eq!(image.dimensions(), (8, 6)),
            other => panic!("Unexpected effects {:?}", other.len()),
        }
    }

    #[test]
    fn test_decode_failure_is_terminal() {
        let (state, _) = init(source());

        let (state, effects) =
            transition(state, Event::DecodeDone(Err(DecodeError::UnsupportedFormat)));

        assert!(matches!(
            state,
            State::Failed {
                original: None,
                error: PipelineError::Decode(DecodeError::UnsupportedFormat)
            }
        ));
        assert!(state.is_terminal());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_classify_success_requests_annotate() {
        let (state, effects) = classified();

        match &state {
            State::Classified { label, .. } => assert_eq!(label.as_str(), "bad"),
            other => panic!("Unexpected state {}", other.name()),
        }
        match effects.as_slice() {
            [Effect::Annotate { label, .. }] => assert_eq!(label.as_str(), "bad"),
            other => panic!("Unexpected effects {:?}", other.len()),
        }
    }

    #[test]
    fn test_classify_failure_keeps_original() {
        let (state, _) = decoded();

        let (state, effects) = transition(
            state,
            Event::ClassifyDone(Err(PipelineError::Classification("nope".into()))),
        );

        match state {
            State::Failed {
                original: Some(original),
                error: PipelineError::Classification(_),
            } => assert_eq!(original.dimensions(), (8, 6)),
            other => panic!("Unexpected state {}", other.name()),
        }
        assert!(effects.is_empty());
    }

    #[test]
    fn test_annotate_success_is_terminal() {
        let (state, _) = classified();
        let annotated = annotate(
            &RgbImage::new(8, 6),
            &QualityLabel::new("bad"),
            &OverlayStyle::default(),
        )
        .unwrap();

        let (state, effects) = transition(state, Event::AnnotateDone(Ok(annotated)));

        assert!(matches!(state, State::Annotated { .. }));
        assert!(state.is_terminal());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_annotate_failure_is_a_render_error() {
        let (state, _) = classified();

        let (state, _) = transition(
            state,
            Event::AnnotateDone(Err(RenderError::InvalidStyle("bad".to_string()))),
        );

        assert!(matches!(
            state,
            State::Failed {
                original: Some(_),
                error: PipelineError::Render(_)
            }
        ));
    }

    #[test]
    fn test_out_of_order_event_is_ignored() {
        let (state, _) = init(source());

        let (state, effects) =
            transition(state, Event::ClassifyDone(Ok(QualityLabel::new("good"))));

        assert!(matches!(state, State::Decoding));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_terminal_state_ignores_events() {
        let (state, _) = init(source());
        let (state, _) = transition(state, Event::DecodeDone(Err(DecodeError::Empty)));

        let (state, effects) = transition(state, Event::DecodeDone(Ok(RgbImage::new(1, 1))));

        assert!(matches!(state, State::Failed { .. }));
        assert!(effects.is_empty());
    }
}
