use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::tract::image::resize_image_to_tensor;
use crate::library::logger::interface::Logger;
use crate::quality_label::QualityLabel;
use image::RgbImage;
use std::sync::Arc;
use tract_onnx::prelude::*;

use super::models::model_config::ModelConfig;

pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if config.labels.is_empty() {
            return Err("model config has no labels".into());
        }

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)?
            .with_input_fact(0, f32::fact(config.input_dims()).into())?
            .into_optimized()?
            .into_runnable()?;

        let logger = logger.with_namespace("classifier").with_namespace("tract");
        logger.info(&format!(
            "Loaded model {} with {} labels",
            config.onnx_model_path.display(),
            config.labels.len()
        ))?;

        Ok(Self {
            model,
            config,
            logger,
        })
    }
}

/// Index and value of the highest finite score.
pub fn arg_max<'a>(scores: impl IntoIterator<Item = &'a f32>) -> Option<(usize, f32)> {
    scores
        .into_iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| score.is_finite())
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        })
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(
        &self,
        image: &RgbImage,
    ) -> Result<QualityLabel, Box<dyn std::error::Error + Send + Sync>> {
        let input = resize_image_to_tensor(
            image,
            self.config.input_shape.1, // width
            self.config.input_shape.0, // height
            self.config.layout,
        );

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("model produced no outputs")?
            .to_array_view::<f32>()?;

        let (index, score) =
            arg_max(output.iter()).ok_or("model produced no finite class scores")?;

        let label = self.config.labels.get(index).ok_or_else(|| {
            format!(
                "model predicted class {} but only {} labels are configured",
                index,
                self.config.labels.len()
            )
        })?;

        self.logger
            .info(&format!("Predicted {} (score {:.3})", label, score))?;

        Ok(QualityLabel::new(label.clone()))
    }
}
