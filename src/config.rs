use crate::annotator::OverlayStyle;
use crate::image_classifier::models::model_config::{ModelConfig, TensorLayout};
use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

/// Static text and layout of the window. Handed to the GUI once at startup.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub title: String,
    pub icon: String,
    pub heading: String,
    pub upload_prompt: String,
    pub upload_help: String,
    pub sample_button: String,
    pub sample_button_help: String,
    pub explore_heading: String,
    pub gallery_heading: String,
    pub footer: String,
    pub accepted_extensions: Vec<String>,
    pub window_size: [f32; 2],
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Road Quality Detection".to_string(),
            icon: "🏗️".to_string(),
            heading: "Road Quality Detection 🛣️🔍📝".to_string(),
            upload_prompt: "Choose an image file to analyze".to_string(),
            upload_help: "Drop a JPEG or PNG here, or type its path, to analyze the road quality."
                .to_string(),
            sample_button: "Try a Random Sample Image".to_string(),
            sample_button_help: "Click to see analysis on a random sample image".to_string(),
            explore_heading: "Explore Sample Images".to_string(),
            gallery_heading: "Sample Image Gallery".to_string(),
            footer: "Made with ❤️ by ~Rabindra Magar".to_string(),
            accepted_extensions: vec!["jpg".to_string(), "png".to_string(), "jpeg".to_string()],
            window_size: [1280.0, 860.0],
        }
    }
}

impl PageConfig {
    pub fn accepts(&self, file_name: &str) -> bool {
        std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let lower = e.to_ascii_lowercase();
                self.accepted_extensions.iter().any(|a| *a == lower)
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub page: PageConfig,
    pub overlay: OverlayStyle,
    pub sample_images: Vec<PathBuf>,
    pub thumbnail_width: u32,
    pub gallery_columns: usize,
    pub classify_timeout: Duration,
    pub sample_seed: u64,
    pub model: ModelConfig,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            overlay: OverlayStyle::default(),
            sample_images: vec![
                PathBuf::from("test_image/autobahn.jpg"),
                PathBuf::from("test_image/bad_road.jpg"),
                PathBuf::from("test_image/sample5.jpg"),
                PathBuf::from("test_image/sample1.jpg"),
            ],
            thumbnail_width: 150,
            gallery_columns: 4,
            classify_timeout: Duration::from_secs(30),
            sample_seed: 0x5eed,
            model: ModelConfig {
                onnx_model_path: PathBuf::from("models/road_quality.onnx"),
                input_shape: (224, 224),
                layout: TensorLayout::Nhwc,
                labels: vec!["good".to_string(), "bad".to_string(), "poor".to_string()],
            },
            logger_timezone: chrono::Utc.fix(),
        }
    }
}
