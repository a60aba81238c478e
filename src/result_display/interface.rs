use crate::quality_label::QualityLabel;
use image::RgbImage;
use std::error::Error;
use std::sync::Arc;

/// Original and annotated image, shown side by side.
#[derive(Clone)]
pub struct AnalysisView {
    pub original_heading: String,
    pub result_heading: String,
    pub original: Arc<RgbImage>,
    pub annotated: RgbImage,
    pub label: QualityLabel,
}

#[derive(Clone)]
pub struct ErrorView {
    pub original_heading: String,
    /// Still shown when decoding succeeded before the failure.
    pub original: Option<Arc<RgbImage>>,
    pub message: String,
}

#[derive(Clone)]
pub struct GalleryItem {
    pub caption: String,
    pub thumbnail: Option<RgbImage>,
}

pub trait ResultDisplay: Send + Sync {
    fn show_analysis(&mut self, view: AnalysisView) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_error(&mut self, view: ErrorView) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_gallery(&mut self, items: Vec<GalleryItem>) -> Result<(), Box<dyn Error + Send + Sync>>;
}
