use crate::config::Config;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_decoder::ImageSource;
use crate::library::logger::interface::Logger;
use crate::pipeline::main::Pipeline;
use crate::result_display::interface::{AnalysisView, ErrorView, GalleryItem, ResultDisplay};
use crate::sample_deck::SampleDeck;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

/// One user action.
#[derive(Debug)]
pub enum Request {
    Upload { file_name: String, bytes: Vec<u8> },
    UploadFile { path: PathBuf },
    RandomSample,
    Gallery,
}

pub struct App {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    pipeline: Pipeline,
    sample_deck: SampleDeck,
    rng: Mutex<StdRng>,
    result_display: Arc<Mutex<dyn ResultDisplay + Send + Sync>>,
}

impl App {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        result_display: Arc<Mutex<dyn ResultDisplay + Send + Sync>>,
    ) -> Self {
        let pipeline = Pipeline::new(&config, image_classifier, logger.clone());
        let sample_deck = SampleDeck::new(config.sample_images.clone());
        let rng = Mutex::new(StdRng::seed_from_u64(config.sample_seed));

        Self {
            logger: logger.with_namespace("app"),
            config,
            pipeline,
            sample_deck,
            rng,
            result_display,
        }
    }

    /// Handles requests one at a time until every sender is gone. A request
    /// that fails is logged and does not stop the loop.
    pub fn run(&self, requests: Receiver<Request>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for request in requests {
            let description = describe(&request);
            if let Err(e) = self.handle(request) {
                let _ = self
                    .logger
                    .error(&format!("Request {} failed: {}", description, e));
            }
        }
        self.logger.info("Request channel closed")?;
        Ok(())
    }

    /// Processing failures are shown to the user; only a failing display is
    /// returned as an error.
    pub fn handle(&self, request: Request) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Handling {}", describe(&request)))?;

        match request {
            Request::Upload { file_name, bytes } => self.analyze_upload(file_name, bytes),
            Request::UploadFile { path } => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());

                match std::fs::read(&path) {
                    Ok(bytes) => self.analyze_upload(file_name, bytes),
                    Err(e) => self.show_error(
                        "Original Image",
                        None,
                        format!("could not read {}: {}", path.display(), e),
                    ),
                }
            }
            Request::RandomSample => {
                let path = {
                    let mut rng = self.rng.lock().map_err(|_| "sample rng lock poisoned")?;
                    self.sample_deck.pick(&mut *rng).map(|p| p.to_path_buf())
                };

                match path {
                    Some(path) => self.analyze(
                        ImageSource::Sample { path },
                        "Sample Image",
                        "Analysis Result",
                    ),
                    None => self.show_error(
                        "Sample Image",
                        None,
                        "no sample images are configured".to_string(),
                    ),
                }
            }
            Request::Gallery => {
                self.logger.info(&format!(
                    "Building gallery of {} samples",
                    self.sample_deck.len()
                ))?;
                let items = self
                    .sample_deck
                    .thumbnails(self.config.thumbnail_width)
                    .into_iter()
                    .map(|thumbnail| {
                        let image = match thumbnail.image {
                            Ok(image) => Some(image),
                            Err(e) => {
                                let _ = self.logger.error(&format!(
                                    "Thumbnail for {} failed: {}",
                                    thumbnail.path.display(),
                                    e
                                ));
                                None
                            }
                        };
                        GalleryItem {
                            caption: thumbnail.caption,
                            thumbnail: image,
                        }
                    })
                    .collect();

                self.display()?.show_gallery(items)
            }
        }
    }

    fn analyze_upload(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.config.page.accepts(&file_name) {
            return self.show_error(
                "Original Image",
                None,
                format!(
                    "{} is not a supported file type (expected one of: {})",
                    file_name,
                    self.config.page.accepted_extensions.join(", ")
                ),
            );
        }

        self.analyze(
            ImageSource::Upload { file_name, bytes },
            "Original Image",
            "Analyzed Image",
        )
    }

    fn analyze(
        &self,
        source: ImageSource,
        original_heading: &str,
        result_heading: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self.pipeline.run(source) {
            Ok(output) => {
                self.logger.info(&format!(
                    "Road quality: {} ({}x{})",
                    output.label,
                    output.original.width(),
                    output.original.height()
                ))?;
                self.display()?.show_analysis(AnalysisView {
                    original_heading: original_heading.to_string(),
                    result_heading: result_heading.to_string(),
                    original: output.original,
                    annotated: output.annotated.image,
                    label: output.label,
                })
            }
            Err(failure) => {
                self.show_error(original_heading, failure.original, failure.error.to_string())
            }
        }
    }

    fn show_error(
        &self,
        original_heading: &str,
        original: Option<Arc<image::RgbImage>>,
        reason: String,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let message = user_message(&reason);
        self.logger.error(&message)?;
        self.display()?.show_error(ErrorView {
            original_heading: original_heading.to_string(),
            original,
            message,
        })
    }

    fn display(
        &self,
    ) -> Result<
        std::sync::MutexGuard<'_, dyn ResultDisplay + Send + Sync + 'static>,
        Box<dyn std::error::Error + Send + Sync>,
    > {
        Ok(self
            .result_display
            .lock()
            .map_err(|_| "result display lock poisoned")?)
    }
}

pub fn user_message(reason: &str) -> String {
    format!("An error occurred while processing your image: {}", reason)
}

fn describe(request: &Request) -> String {
    match request {
        Request::Upload { file_name, bytes } => {
            format!("upload {} ({} bytes)", file_name, bytes.len())
        }
        Request::UploadFile { path } => format!("upload {}", path.display()),
        Request::RandomSample => "random sample".to_string(),
        Request::Gallery => "gallery".to_string(),
    }
}
