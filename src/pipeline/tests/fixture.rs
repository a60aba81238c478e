use crate::config::Config;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_decoder::{encode, ImageSource};
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::pipeline::main::Pipeline;
use crate::quality_label::QualityLabel;
use image::{ImageFormat, Rgb, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub enum StubOutcome {
    Label(String),
    Fail(String),
    Panic,
}

/// Deterministic classifier that counts how often it is called.
pub struct ClassifierStub {
    outcome: StubOutcome,
    delay: Duration,
    calls: AtomicUsize,
}

impl ClassifierStub {
    pub fn returning(label: &str) -> Self {
        Self {
            outcome: StubOutcome::Label(label.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: StubOutcome::Fail(message.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn panicking() -> Self {
        Self {
            outcome: StubOutcome::Panic,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageClassifier for ClassifierStub {
    fn classify(
        &self,
        _image: &RgbImage,
    ) -> Result<QualityLabel, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        match &self.outcome {
            StubOutcome::Label(label) => Ok(QualityLabel::new(label.clone())),
            StubOutcome::Fail(message) => Err(message.clone().into()),
            StubOutcome::Panic => panic!("classifier stub panicked"),
        }
    }
}

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub image_classifier: Arc<ClassifierStub>,
    pub pipeline: Pipeline,
}

impl Fixture {
    pub fn new(image_classifier: ClassifierStub) -> Self {
        Self::with_config(Config::default(), image_classifier)
    }

    pub fn with_config(config: Config, image_classifier: ClassifierStub) -> Self {
        let logger = Arc::new(LoggerConsole::new(config.logger_timezone));
        let image_classifier = Arc::new(image_classifier);
        let pipeline = Pipeline::new(&config, image_classifier.clone(), logger.clone());

        Self {
            config,
            logger,
            image_classifier,
            pipeline,
        }
    }
}

pub fn road_photo(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let shade = 90 + ((x / 8 + y / 8) % 2) as u8 * 40;
        Rgb([shade, shade, shade])
    })
}

pub fn upload(image: &RgbImage, format: ImageFormat) -> ImageSource {
    let extension = match format {
        ImageFormat::Png => "png",
        _ => "jpg",
    };
    ImageSource::Upload {
        file_name: format!("road.{}", extension),
        bytes: encode(image, format).unwrap(),
    }
}
