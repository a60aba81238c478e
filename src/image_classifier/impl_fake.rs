use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::quality_label::QualityLabel;
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Stand-in used when no model is available: picks a label at random.
pub struct ImageClassifierFake {
    labels: Vec<String>,
    rng: Mutex<StdRng>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(labels: Vec<String>, seed: u64, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            labels,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            logger: logger.with_namespace("classifier").with_namespace("fake"),
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        image: &RgbImage,
    ) -> Result<QualityLabel, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Classifying {}x{} image with fake classifier...",
            image.width(),
            image.height()
        ))?;

        if self.labels.is_empty() {
            return Err("fake classifier has no labels".into());
        }

        let index = self
            .rng
            .lock()
            .map_err(|_| "fake classifier rng lock poisoned")?
            .random_range(0..self.labels.len());

        Ok(QualityLabel::new(self.labels[index].clone()))
    }
}
