use crate::quality_label::QualityLabel;
use image::RgbImage;

pub trait ImageClassifier: Send + Sync {
    fn classify(
        &self,
        image: &RgbImage,
    ) -> Result<QualityLabel, Box<dyn std::error::Error + Send + Sync>>;
}
